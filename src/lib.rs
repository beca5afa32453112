// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Basebrawl: a narrative baseball simulator.
//!
//! Two rosters play nine innings (more if tied) and the engine writes the
//! play-by-play as it goes. Players get winded, knocked out and killed;
//! fouls sour the mood until benches clear; trailing teams get riled up.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Series Runner (rayon)  /  CLI     │
//! ├─────────────────────────────────────┤
//! │   Full Game -> Half Inning          │
//! ├─────────────────────────────────────┤
//! │   At-Bat, Baserunning, Brawls ...   │
//! ├─────────────────────────────────────┤
//! │   Roster Loading (csv + serde)      │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every game owns a seeded [`rand_chacha::ChaCha8Rng`], so a seed and a pair
//! of rosters fully determine the log.

pub mod error;
pub mod game;
pub mod roster;
pub mod series;

pub use error::{GameError, RosterError};

// Re-export key game types at crate root for convenience
pub use game::{
    Game, GameConfig, GameOutcome, GameReport, Player, Side, Stats, Team, play_full_game,
};
pub use roster::{Rosters, load_rosters};
pub use series::{SeriesStats, run_series};
