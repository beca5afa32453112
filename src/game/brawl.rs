//! Bench-clearing brawls and the injuries they leave behind.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::debug;

use crate::game::narrate::join_names;
use crate::game::player::{Injury, KNOCKOUT_HALVES, Player, RosterIndex};
use crate::game::state::{GameState, Side};

/// Events that can set off a brawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BrawlTrigger {
    /// Batter burned alive by a hot pitch.
    Incinerated,
    /// Batter hit by a pitch.
    Beaned,
    /// Runner and defender collided.
    Collision,
    /// Home run that barely cleared the fence.
    NearMissHomeRun,
    /// Four runs on one swing.
    GrandSlam,
    /// Runner tagged out by a hair.
    CloseTagOut,
    /// Ordinary single.
    Single,
    /// Ordinary double.
    Double,
    /// Ordinary triple.
    Triple,
    /// Strikeout.
    Strikeout,
    /// Fly out.
    FlyOut,
    /// Ground out.
    GroundOut,
    /// Ordinary home run.
    HomeRun,
}

impl BrawlTrigger {
    /// Base brawl chance in percent, before the foul mood bonus.
    #[must_use]
    pub const fn base_chance(self) -> i32 {
        match self {
            Self::Incinerated => 100,
            Self::Beaned | Self::Collision => 50,
            Self::NearMissHomeRun | Self::GrandSlam | Self::CloseTagOut => 25,
            Self::Single
            | Self::Double
            | Self::Triple
            | Self::Strikeout
            | Self::FlyOut
            | Self::GroundOut
            | Self::HomeRun => -50,
        }
    }
}

/// What a brawl or collision does to one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Harm {
    /// Lingering debuff.
    Hurt(Injury),
    /// Out for [`KNOCKOUT_HALVES`] half-innings.
    KnockedOut,
    /// Dies once the play is over.
    Killed,
}

impl Harm {
    /// Severity from a d100 roll.
    #[must_use]
    pub const fn from_roll(roll: i32) -> Self {
        match roll {
            ..=30 => Self::Hurt(Injury::Winded),
            31..=55 => Self::Hurt(Injury::ShookUp),
            56..=75 => Self::Hurt(Injury::Injured),
            76..=95 => Self::KnockedOut,
            _ => Self::Killed,
        }
    }

    /// Word used in casualty reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hurt(Injury::Winded) => "winded",
            Self::Hurt(Injury::ShookUp) => "shook up",
            Self::Hurt(Injury::Injured) => "injured",
            Self::KnockedOut => "knocked out",
            Self::Killed => "killed",
        }
    }
}

/// Apply `harm` to a player. Dead and knocked-out players are left alone.
///
/// A new injury never replaces a worse one.
pub fn apply_harm(player: &mut Player, harm: Harm) {
    if player.is_dead || player.is_knocked_out() {
        return;
    }
    match harm {
        Harm::Killed => player.pending_death = true,
        Harm::KnockedOut => player.knockout_halves_remaining = KNOCKOUT_HALVES,
        Harm::Hurt(injury) => {
            let worst = player.injury().map_or(injury, |current| current.max(injury));
            player.set_injury(Some(worst));
        }
    }
}

/// Casualties for each side after a brawl between totals `away` and `home`.
///
/// The loser takes `max(1, margin / 10)`; the winner takes one when the
/// loser takes more than one. A tie costs each side one.
#[must_use]
pub fn casualty_counts(away: i32, home: i32) -> [usize; 2] {
    let margin = usize::try_from(away.abs_diff(home)).unwrap_or(usize::MAX);
    let losses = (margin / 10).max(1);
    let winner_losses = usize::from(losses > 1);
    match away.cmp(&home) {
        std::cmp::Ordering::Greater => [winner_losses, losses],
        std::cmp::Ordering::Less => [losses, winner_losses],
        std::cmp::Ordering::Equal => [1, 1],
    }
}

/// Roll for a brawl after `trigger`; returns the play-by-play, empty if nothing happened.
pub fn maybe_trigger_brawl(state: &mut GameState, trigger: BrawlTrigger) -> Vec<String> {
    let chance = (trigger.base_chance() + state.foul_mood.bonus()).clamp(0, 100);
    if chance == 0 {
        return Vec::new();
    }
    let roll = state.d100();
    if roll > chance {
        return Vec::new();
    }
    debug!(?trigger, chance, roll, "brawl triggered");
    let lines = simulate_brawl(state);
    for team in &mut state.teams {
        team.finalize_pending_deaths();
    }
    state.foul_mood.reset();
    lines
}

/// Run a brawl between everyone still standing.
pub fn simulate_brawl(state: &mut GameState) -> Vec<String> {
    let mut lines = vec!["💪 A BRAWL HAS ERUPTED ON THE FIELD! 💪".to_string()];

    let mut brawlers: [Vec<RosterIndex>; 2] = [Vec::new(), Vec::new()];
    let mut totals = [0i32; 2];
    for side in Side::BOTH {
        let roster = &state.teams[side.index()].players;
        let mut fighters: Vec<RosterIndex> = (0..roster.len())
            .filter(|&idx| roster[idx].is_active())
            .collect();
        let strength: i32 = fighters.iter().map(|&idx| roster[idx].stats().brawling).sum();
        fighters.shuffle(&mut state.rng);
        totals[side.index()] = strength + state.rng.gen_range(1..=100);
        brawlers[side.index()] = fighters;
    }

    lines.push(format!(
        "{} ({}) vs {} ({})",
        state.teams[0].name, totals[0], state.teams[1].name, totals[1]
    ));
    debug!(away = totals[0], home = totals[1], "brawl totals");

    let counts = casualty_counts(totals[0], totals[1]);
    for side in Side::BOTH {
        let won = totals[side.index()] > totals[side.opponent().index()];
        let mut casualties: Vec<(Harm, String)> = Vec::new();
        for &idx in brawlers[side.index()].iter().take(counts[side.index()]) {
            let mut harm = Harm::from_roll(state.d100());
            if won && matches!(harm, Harm::KnockedOut | Harm::Killed) {
                harm = Harm::Hurt(Injury::Injured);
            }
            let player = &mut state.teams[side.index()].players[idx];
            casualties.push((harm, player.name.clone()));
            apply_harm(player, harm);
        }
        if let Some(report) = casualty_report(&state.teams[side.index()].name, casualties) {
            lines.push(report);
        }
    }

    lines.push("🌞 Order is restored and the game continues! 🌞".to_string());
    lines
}

/// `Scorpions casualties: Vera Knox is winded! A and B are injured!`
fn casualty_report(team_name: &str, mut casualties: Vec<(Harm, String)>) -> Option<String> {
    if casualties.is_empty() {
        return None;
    }
    casualties.sort_by_key(|(harm, _)| *harm);
    let mut parts: Vec<String> = Vec::new();
    for group in casualties.chunk_by(|a, b| a.0 == b.0) {
        let names: Vec<String> = group.iter().map(|(_, name)| name.clone()).collect();
        let verb = if names.len() == 1 { "is" } else { "are" };
        parts.push(format!(
            "{} {verb} {}!",
            join_names(&names),
            group[0].0.label()
        ));
    }
    Some(format!("{team_name} casualties: {}", parts.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::Stats;
    use crate::game::state::Team;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team(name: &str, brawling: i32) -> Team {
        let players = (0..9)
            .map(|i| {
                let mut stats = Stats::default().map(|_| 5);
                stats.brawling = brawling;
                Player::new(format!("{name} {i}"), stats)
            })
            .collect();
        Team::new(name, players)
    }

    fn state(seed: u64) -> GameState {
        GameState::new(
            team("Scorpions", 5),
            team("Aether", 5),
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_injury_from_roll() {
        assert_eq!(Harm::from_roll(1), Harm::Hurt(Injury::Winded));
        assert_eq!(Harm::from_roll(30), Harm::Hurt(Injury::Winded));
        assert_eq!(Harm::from_roll(31), Harm::Hurt(Injury::ShookUp));
        assert_eq!(Harm::from_roll(75), Harm::Hurt(Injury::Injured));
        assert_eq!(Harm::from_roll(95), Harm::KnockedOut);
        assert_eq!(Harm::from_roll(96), Harm::Killed);
    }

    #[test]
    fn test_casualty_counts() {
        assert_eq!(casualty_counts(50, 50), [1, 1]);
        assert_eq!(casualty_counts(55, 50), [0, 1]);
        assert_eq!(casualty_counts(80, 50), [1, 3]);
        assert_eq!(casualty_counts(50, 69), [1, 0]);
        assert_eq!(casualty_counts(10, 100), [9, 1]);
    }

    #[test]
    fn test_apply_harm() {
        let mut player = Player::new("Vera Knox", Stats::default().map(|_| 6));
        apply_harm(&mut player, Harm::Hurt(Injury::ShookUp));
        assert_eq!(player.injury(), Some(Injury::ShookUp));
        assert_eq!(player.stats().power, 2);

        apply_harm(&mut player, Harm::Hurt(Injury::Winded));
        assert_eq!(player.injury(), Some(Injury::ShookUp));

        apply_harm(&mut player, Harm::KnockedOut);
        assert_eq!(player.knockout_halves_remaining, KNOCKOUT_HALVES);

        apply_harm(&mut player, Harm::Killed);
        assert!(!player.pending_death);
    }

    #[test]
    fn test_killed_sets_pending_death() {
        let mut player = Player::new("Vera Knox", Stats::default());
        apply_harm(&mut player, Harm::Killed);
        assert!(player.pending_death);
        assert!(!player.is_dead);
    }

    #[test]
    fn test_negative_chance_never_brawls() {
        let mut game = state(11);
        for _ in 0..200 {
            assert!(maybe_trigger_brawl(&mut game, BrawlTrigger::Strikeout).is_empty());
        }
    }

    #[test]
    fn test_incineration_always_brawls() {
        let mut game = state(12);
        game.foul_mood.update(true);
        game.foul_mood.update(true);
        assert!(game.foul_mood.bonus() > 0);

        let lines = maybe_trigger_brawl(&mut game, BrawlTrigger::Incinerated);
        assert_eq!(lines[0], "💪 A BRAWL HAS ERUPTED ON THE FIELD! 💪");
        assert_eq!(
            lines.last().map(String::as_str),
            Some("🌞 Order is restored and the game continues! 🌞")
        );
        assert!(lines.iter().any(|l| l.contains("casualties:")));
        assert_eq!(game.foul_mood.bonus(), 0);
        for team in &game.teams {
            assert!(team.players.iter().all(|p| !p.pending_death));
        }
    }

    #[test]
    fn test_winner_is_never_killed() {
        for seed in 0..50 {
            let mut game = GameState::new(
                team("Scorpions", 30),
                team("Aether", 0),
                ChaCha8Rng::seed_from_u64(seed),
            );
            simulate_brawl(&mut game);
            let winners = &game.teams[0].players;
            assert!(winners.iter().all(|p| !p.pending_death && !p.is_knocked_out()));
        }
    }

    #[test]
    fn test_casualty_report_groups_by_severity() {
        let report = casualty_report(
            "Aether",
            vec![
                (Harm::Hurt(Injury::Injured), "A".to_string()),
                (Harm::Hurt(Injury::Winded), "B".to_string()),
                (Harm::Hurt(Injury::Injured), "C".to_string()),
            ],
        );
        assert_eq!(
            report.as_deref(),
            Some("Aether casualties: B is winded! A and C are injured!")
        );
    }
}
