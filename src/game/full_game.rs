//! Full-game orchestration: pitchers, defenses, innings, extra innings and the final word.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::GameError;
use crate::game::defense::Defense;
use crate::game::half_inning::{HalfInningContext, play_half_inning};
use crate::game::narrate::{ordinal, win_verb};
use crate::game::player::{Player, RosterIndex};
use crate::game::state::{GameRng, GameState, Scoreboard, Side, Team};

/// Tunable game length and morale settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Regulation innings.
    pub innings: u32,
    /// Last extra inning before a tie is declared.
    pub max_innings: u32,
    /// Deficit at the end of a half that riles the batting team.
    pub riled_deficit: u32,
    /// Seed for the game's random source; random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            innings: 9,
            max_innings: 13,
            riled_deficit: 3,
            seed: None,
        }
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GameOutcome {
    /// Won on runs.
    Winner {
        /// The winning side.
        side: Side,
    },
    /// Still level after the last extra inning.
    Tie,
    /// One side could not field a pitcher or a batter.
    Forfeit {
        /// The side left standing.
        winner: Side,
    },
}

impl GameOutcome {
    /// The winning side, if there is one.
    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::Winner { side } | Self::Forfeit { winner: side } => Some(side),
            Self::Tie => None,
        }
    }
}

/// Everything worth keeping from a finished game.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    /// Away team name.
    pub away: String,
    /// Home team name.
    pub home: String,
    /// Final score.
    pub score: Scoreboard,
    /// How it ended.
    pub outcome: GameOutcome,
    /// Innings started.
    pub innings: u32,
    /// Seed the game ran with.
    pub seed: u64,
    /// Away players dead at the final out.
    pub away_deaths: usize,
    /// Home players dead at the final out.
    pub home_deaths: usize,
    /// Full play-by-play.
    pub log: Vec<String>,
}

impl GameReport {
    /// Name of the winning team.
    #[must_use]
    pub fn winner_name(&self) -> Option<&str> {
        self.outcome.winner().map(|side| match side {
            Side::Away => self.away.as_str(),
            Side::Home => self.home.as_str(),
        })
    }
}

/// A game ready to be played.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    state: GameState,
    seed: u64,
    innings: u32,
    log: Vec<String>,
}

impl Game {
    /// Set up a game between two teams. Team names must differ.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DuplicateTeamName`] if both teams share a name.
    pub fn new(config: GameConfig, away: Team, home: Team) -> Result<Self, GameError> {
        if away.name == home.name {
            return Err(GameError::DuplicateTeamName(away.name));
        }
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            state: GameState::new(away, home, GameRng::seed_from_u64(seed)),
            seed,
            innings: 0,
            log: Vec::new(),
        })
    }

    /// The seed this game will run with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Play to the end and report.
    #[instrument(skip(self), fields(away = %self.state.teams[0].name, home = %self.state.teams[1].name, seed = self.seed))]
    pub fn play(mut self) -> GameReport {
        info!("game started");
        let away = self.state.teams[0].name.clone();
        let home = self.state.teams[1].name.clone();
        self.log.push("🚩️ Welcome to today's game! 🚩️".to_string());
        self.log.push(format!("🏆 Matchup: {away} vs. {home} 🏆"));
        self.log.push("💥 PLAY BALL! 💥".to_string());
        self.log.push(String::new());

        let outcome = match self.play_innings() {
            Ok(outcome) | Err(outcome) => outcome,
        };

        if let GameOutcome::Winner { side } = outcome {
            let name = self.state.team(side).name.clone();
            self.log.push("🎉 Game Over! 🎉".to_string());
            self.log.push(String::new());
            self.log.push(format!("🏆 {name} {}! 🏆", win_verb(&name)));
        }

        info!(
            away_runs = self.state.score.away,
            home_runs = self.state.score.home,
            ?outcome,
            innings = self.innings,
            "game over"
        );
        GameReport {
            away,
            home,
            score: self.state.score,
            outcome,
            innings: self.innings,
            seed: self.seed,
            away_deaths: self.state.teams[0].deaths(),
            home_deaths: self.state.teams[1].deaths(),
            log: self.log,
        }
    }

    /// Regulation then extras. A forfeit short-circuits through `Err`.
    fn play_innings(&mut self) -> Result<GameOutcome, GameOutcome> {
        let regulation = self.config.innings;
        for inning in 1..=regulation {
            self.play_inning(inning)?;
        }

        if self.state.score.leader().is_none() {
            self.log.push(format!(
                "✨ Game tied at the end of the {} inning. Extra innings begin! ✨",
                ordinal(regulation)
            ));
            self.log.push(String::new());
            let mut inning = regulation + 1;
            while inning <= self.config.max_innings && self.state.score.leader().is_none() {
                self.play_inning(inning)?;
                inning += 1;
            }
        }

        match self.state.score.leader() {
            Some(side) => Ok(GameOutcome::Winner { side }),
            None => {
                self.log.push(format!(
                    "💀 Game tied at the end of the {} inning. Everyone dies! 💀",
                    ordinal(self.config.max_innings.max(regulation))
                ));
                self.log.push(String::new());
                Ok(GameOutcome::Tie)
            }
        }
    }

    fn play_inning(&mut self, inning: u32) -> Result<(), GameOutcome> {
        self.innings = inning;
        let regulation = self.config.innings;
        if inning > regulation {
            self.rest_tired_staffs();
        }

        let home_pitcher = self.select_pitcher(Side::Home)?;
        let away_pitcher = self.select_pitcher(Side::Away)?;
        let home_defense = self.assign_defense(Side::Home, home_pitcher);
        let away_defense = self.assign_defense(Side::Away, away_pitcher);
        let away = self.state.teams[0].name.clone();
        let home = self.state.teams[1].name.clone();

        self.log
            .push(format!("=== Inning {inning}, Top: {away} Batting ==="));
        self.log.push(format!(
            "⚾ Pitching for {home}: {}",
            self.state.player(Side::Home, home_pitcher).name
        ));
        let context = HalfInningContext {
            inning,
            regulation,
            riled_deficit: self.config.riled_deficit,
            suppress_riled: false,
        };
        let top = play_half_inning(&mut self.state, Side::Away, &home_defense, context);
        self.log.extend(top.lines);
        if top.forfeit {
            return Err(self.forfeit(Side::Away, "has forfeited!", "is declared the winner."));
        }
        self.state.player_mut(Side::Home, home_pitcher).tire();

        let mut header = format!("=== Inning {inning}, Bottom: {home} Batting ===");
        if inning == regulation && self.state.score.leader() == Some(Side::Home) {
            header.push_str(" 🍌 SHAME! 🍌");
        }
        self.log.push(header);
        self.log.push(format!(
            "⚾ Pitching for {away}: {}",
            self.state.player(Side::Away, away_pitcher).name
        ));
        let bottom_context = HalfInningContext {
            suppress_riled: inning == regulation,
            ..context
        };
        let bottom = play_half_inning(&mut self.state, Side::Home, &away_defense, bottom_context);
        self.log.extend(bottom.lines);
        if bottom.forfeit {
            return Err(self.forfeit(Side::Home, "has forfeited!", "is declared the winner."));
        }
        self.state.player_mut(Side::Away, away_pitcher).tire();
        Ok(())
    }

    /// Best rested arm, else any active player, else the side forfeits.
    fn select_pitcher(&mut self, side: Side) -> Result<RosterIndex, GameOutcome> {
        let team = self.state.team(side);
        if let Some(idx) = team.best_rested_pitcher() {
            return Ok(idx);
        }
        let active: Vec<RosterIndex> = (0..team.players.len())
            .filter(|&idx| team.players[idx].is_active())
            .collect();
        match active.choose(&mut self.state.rng) {
            Some(&idx) => Ok(idx),
            None => Err(self.forfeit(
                side,
                "has no eligible pitchers left!",
                "wins by forfeit.",
            )),
        }
    }

    fn assign_defense(&mut self, side: Side, pitcher: RosterIndex) -> Defense {
        let roster_len = self.state.team(side).players.len();
        Defense::assign(roster_len, pitcher, &mut self.state.rng)
    }

    /// In extra innings a staff that has pitched itself out gets fresh arms.
    fn rest_tired_staffs(&mut self) {
        let (teams, rng) = (&mut self.state.teams, &mut self.state.rng);
        for team in teams.iter_mut() {
            if team.all_exhausted() {
                team.roll_stints(rng);
            }
        }
    }

    fn forfeit(&mut self, loser: Side, what: &str, verdict: &str) -> GameOutcome {
        let winner = loser.opponent();
        let loser_name = &self.state.team(loser).name;
        let winner_name = &self.state.team(winner).name;
        warn!(loser = %loser_name, "forfeit");
        self.log
            .push(format!("{loser_name} {what} {winner_name} {verdict}"));
        GameOutcome::Forfeit { winner }
    }
}

/// Play a full game between two rosters and return the play-by-play.
///
/// Rosters are cloned, so the caller's players come out untouched. There are
/// no separate pitcher lists: each inning's pitcher is drawn from the roster.
/// Use [`Game`] for a seed, custom innings or the structured report.
///
/// # Errors
///
/// Returns [`GameError::DuplicateTeamName`] if the names match.
pub fn play_full_game(
    roster_a: &[Player],
    roster_b: &[Player],
    name_a: &str,
    name_b: &str,
) -> Result<Vec<String>, GameError> {
    let away = Team::new(name_a, roster_a.to_vec());
    let home = Team::new(name_b, roster_b.to_vec());
    Ok(Game::new(GameConfig::default(), away, home)?.play().log)
}
