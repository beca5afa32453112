//! Play command implementation.

use super::output::format_play_text;
use super::{CliError, PlayFormat, game_config};
use basebrawl::{Game, RosterError, Rosters, Team, load_rosters};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded or the teams cannot be drawn.
pub(crate) fn execute(
    roster: &Path,
    away: Option<String>,
    home: Option<String>,
    seed: Option<u64>,
    innings: u32,
    max_innings: u32,
    format: PlayFormat,
) -> Result<(), CliError> {
    let rosters = load_rosters(roster)?;

    // Generate seed if not provided so the game can be replayed
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let (away, home) = match (away, home) {
        (None, None) => rosters.pick_matchup(&mut rng)?,
        (Some(away), Some(home)) => {
            let mut away = rosters.team(&away)?;
            let mut home = rosters.team(&home)?;
            away.roll_stints(&mut rng);
            home.roll_stints(&mut rng);
            (away, home)
        }
        (Some(away), None) => {
            let mut away = rosters.team(&away)?;
            let mut home = pick_opponent(&rosters, &away.name, &mut rng)?;
            away.roll_stints(&mut rng);
            home.roll_stints(&mut rng);
            (away, home)
        }
        (None, Some(home)) => {
            let mut home = rosters.team(&home)?;
            let mut away = pick_opponent(&rosters, &home.name, &mut rng)?;
            away.roll_stints(&mut rng);
            home.roll_stints(&mut rng);
            (away, home)
        }
    };

    let config = game_config(innings, max_innings, Some(seed))?;
    let report = Game::new(config, away, home)?.play();

    match format {
        PlayFormat::Text => print!("{}", format_play_text(&report)),
        PlayFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Any team other than `exclude`.
fn pick_opponent(
    rosters: &Rosters,
    exclude: &str,
    rng: &mut ChaCha8Rng,
) -> Result<Team, CliError> {
    let candidates: Vec<&Team> = rosters
        .teams()
        .iter()
        .filter(|t| t.name != exclude)
        .collect();
    candidates
        .choose(rng)
        .map(|&team| team.clone())
        .ok_or_else(|| RosterError::TooFewTeams(rosters.len()).into())
}
