//! Parallel series runner.
//!
//! Plays the same matchup many times on the rayon pool. Game `i` runs with
//! seed `base_seed + i` on its own copy of both rosters, so a series is as
//! reproducible as a single game regardless of thread count.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::GameError;
use crate::game::{Game, GameConfig, GameOutcome, GameReport, Side, Team};

/// Aggregated results of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesStats {
    /// Games played.
    pub games: u64,
    /// Away wins, forfeits included.
    pub away_wins: u64,
    /// Home wins, forfeits included.
    pub home_wins: u64,
    /// Games still level after the last extra inning.
    pub ties: u64,
    /// Games decided by forfeit.
    pub forfeits: u64,
    /// Total away runs.
    pub away_runs: u64,
    /// Total home runs.
    pub home_runs: u64,
    /// Total away players killed.
    pub away_deaths: u64,
    /// Total home players killed.
    pub home_deaths: u64,
    /// Games that went past regulation.
    pub extra_inning_games: u64,
}

impl SeriesStats {
    /// Fold one finished game into the totals.
    pub fn add(&mut self, report: &GameReport, regulation: u32) {
        self.games += 1;
        match report.outcome {
            GameOutcome::Winner { side } => self.add_win(side),
            GameOutcome::Forfeit { winner } => {
                self.forfeits += 1;
                self.add_win(winner);
            }
            GameOutcome::Tie => self.ties += 1,
        }
        self.away_runs += u64::from(report.score.away);
        self.home_runs += u64::from(report.score.home);
        self.away_deaths += report.away_deaths as u64;
        self.home_deaths += report.home_deaths as u64;
        if report.innings > regulation {
            self.extra_inning_games += 1;
        }
    }

    fn add_win(&mut self, side: Side) {
        match side {
            Side::Away => self.away_wins += 1,
            Side::Home => self.home_wins += 1,
        }
    }

    /// Merge another partial tally into this one.
    pub fn merge(&mut self, other: &Self) {
        self.games += other.games;
        self.away_wins += other.away_wins;
        self.home_wins += other.home_wins;
        self.ties += other.ties;
        self.forfeits += other.forfeits;
        self.away_runs += other.away_runs;
        self.home_runs += other.home_runs;
        self.away_deaths += other.away_deaths;
        self.home_deaths += other.home_deaths;
        self.extra_inning_games += other.extra_inning_games;
    }

    /// Share of games won by `side` (0.0-1.0).
    #[must_use]
    pub fn win_rate(&self, side: Side) -> f64 {
        let wins = match side {
            Side::Away => self.away_wins,
            Side::Home => self.home_wins,
        };
        self.rate(wins)
    }

    /// Share of games tied (0.0-1.0).
    #[must_use]
    pub fn tie_rate(&self) -> f64 {
        self.rate(self.ties)
    }

    /// Mean runs per game for `side`.
    #[must_use]
    pub fn avg_runs(&self, side: Side) -> f64 {
        let runs = match side {
            Side::Away => self.away_runs,
            Side::Home => self.home_runs,
        };
        self.rate(runs)
    }

    #[allow(clippy::cast_precision_loss)]
    fn rate(&self, count: u64) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        count as f64 / self.games as f64
    }
}

/// Play `games` games between `away` and `home` in parallel.
///
/// # Errors
///
/// Returns [`GameError::DuplicateTeamName`] if both teams share a name.
#[instrument(skip(away, home, config), fields(away = %away.name, home = %home.name))]
pub fn run_series(
    away: &Team,
    home: &Team,
    config: GameConfig,
    games: u64,
    base_seed: u64,
) -> Result<SeriesStats, GameError> {
    if away.name == home.name {
        return Err(GameError::DuplicateTeamName(away.name.clone()));
    }

    // Each worker tallies locally; partial tallies merge at the end.
    let stats = (0..games)
        .into_par_iter()
        .fold(SeriesStats::default, |mut local, i| {
            let config = GameConfig {
                seed: Some(base_seed.wrapping_add(i)),
                ..config
            };
            if let Ok(game) = Game::new(config, away.clone(), home.clone()) {
                local.add(&game.play(), config.innings);
            }
            local
        })
        .reduce(SeriesStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    info!(
        games = stats.games,
        away_wins = stats.away_wins,
        home_wins = stats.home_wins,
        ties = stats.ties,
        "series finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Player, Stats};

    fn team(name: &str, value: i32) -> Team {
        let players = (0..9)
            .map(|i| Player::new(format!("{name} {i}"), Stats::default().map(|_| value)))
            .collect();
        Team::new(name, players)
    }

    #[test]
    fn test_series_counts_every_game() {
        let stats = run_series(
            &team("Scorpions", 5),
            &team("Aether", 5),
            GameConfig::default(),
            12,
            1000,
        )
        .unwrap();
        assert_eq!(stats.games, 12);
        assert_eq!(stats.away_wins + stats.home_wins + stats.ties, 12);
        assert!(stats.forfeits <= stats.away_wins + stats.home_wins);
        assert!(stats.extra_inning_games >= stats.ties);
    }

    #[test]
    fn test_series_is_reproducible() {
        let run = || {
            run_series(
                &team("Scorpions", 6),
                &team("Aether", 4),
                GameConfig::default(),
                8,
                77,
            )
            .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_series_rejects_duplicate_names() {
        let err = run_series(
            &team("Scorpions", 5),
            &team("Scorpions", 5),
            GameConfig::default(),
            3,
            0,
        );
        assert_eq!(
            err,
            Err(GameError::DuplicateTeamName("Scorpions".to_string()))
        );
    }

    #[test]
    fn test_merge_and_rates() {
        let mut a = SeriesStats {
            games: 2,
            away_wins: 1,
            home_wins: 1,
            away_runs: 6,
            home_runs: 4,
            ..SeriesStats::default()
        };
        let b = SeriesStats {
            games: 2,
            away_wins: 1,
            ties: 1,
            away_runs: 2,
            home_runs: 2,
            ..SeriesStats::default()
        };
        a.merge(&b);
        assert_eq!(a.games, 4);
        assert!((a.win_rate(Side::Away) - 0.5).abs() < 1e-9);
        assert!((a.tie_rate() - 0.25).abs() < 1e-9);
        assert!((a.avg_runs(Side::Home) - 1.5).abs() < 1e-9);
        assert!(SeriesStats::default().win_rate(Side::Home).abs() < 1e-9);
    }
}
