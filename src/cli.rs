//! CLI command implementations for Basebrawl.

pub(crate) mod play;
pub(crate) mod series;
pub(crate) mod validate;

mod output;

use basebrawl::{GameConfig, GameError, RosterError};
use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Output format for the `play` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PlayFormat {
    /// The play-by-play as printed lines.
    Text,
    /// Machine-readable JSON report.
    Json,
}

/// Output format for the `series` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SeriesFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Build a game config from the common CLI flags.
pub(crate) fn game_config(
    innings: u32,
    max_innings: u32,
    seed: Option<u64>,
) -> Result<GameConfig, CliError> {
    if innings == 0 {
        return Err(CliError::new("--innings must be at least 1"));
    }
    Ok(GameConfig {
        innings,
        max_innings: max_innings.max(innings),
        seed,
        ..GameConfig::default()
    })
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<RosterError> for CliError {
    fn from(e: RosterError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
