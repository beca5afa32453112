//! Error types for game setup and roster loading.
//!
//! Nothing that happens during play is an error: forfeits, deaths and
//! thirteen-inning ties are ordinary outcomes. These types only cover
//! inputs that cannot produce a game at all.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when a game cannot be set up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Both sides were given the same name.
    #[error("both teams are named {0:?}; team names must be distinct")]
    DuplicateTeamName(String),
}

/// Errors raised while loading rosters from CSV.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The roster file could not be read.
    #[error("failed to read roster {path}: {source}")]
    Io {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A row could not be parsed.
    #[error("malformed roster data: {0}")]
    Csv(#[from] csv::Error),

    /// A stat value was out of range.
    #[error("player {player:?} has invalid {stat} value {value}")]
    InvalidStat {
        /// Player with the bad value.
        player: String,
        /// Column name.
        stat: &'static str,
        /// Offending value.
        value: i32,
    },

    /// A requested team is not in the roster.
    #[error("no team named {0:?} in roster")]
    UnknownTeam(String),

    /// A matchup needs at least two teams.
    #[error("roster has {0} team(s); at least 2 are needed for a game")]
    TooFewTeams(usize),
}
