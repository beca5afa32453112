//! Game layer for Basebrawl.
//!
//! Implements the rules of a single game:
//! - Players, injuries and the riled-up buff
//! - Pitch-by-pitch at-bats, bunts and rundowns
//! - Baserunning, pickoffs and steals
//! - Brawls, recovery and forfeits
//! - Half-inning and full-game orchestration

mod at_bat;
mod bases;
mod baserunning;
mod brawl;
mod defense;
mod full_game;
mod half_inning;
mod invariants;
mod morale;
mod narrate;
mod player;
mod recovery;
mod running_game;
mod state;

pub use at_bat::{
    AtBat, AtBatOutcome, Contact, FOUL_LIMIT, HitKind, ball_threshold, classify_contact,
    resolve_at_bat,
};
pub use bases::{Base, Bases, format_bso};
pub use baserunning::{HitResolution, RunResult, baserunning_result, resolve_hit};
pub use brawl::{
    BrawlTrigger, Harm, apply_harm, casualty_counts, maybe_trigger_brawl, simulate_brawl,
};
pub use defense::{Coverage, Defense, Position, cover_base, fielder_score};
pub use full_game::{Game, GameConfig, GameOutcome, GameReport, play_full_game};
pub use half_inning::{HalfInning, HalfInningContext, MERCY_PLATE_APPEARANCES, play_half_inning};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use morale::{FOUL_MOOD_TIERS, FoulMood, MAX_RILED_TIER, RiledUp};
pub use narrate::{
    format_scorers, hit_description, home_run_headline, join_names, ordinal, win_verb,
};
pub use player::{
    BASE_STINT, Injury, KNOCKOUT_HALVES, MAX_STINT, Player, RosterIndex, Stats, pitching_stint,
};
pub use recovery::{RECOVERY_BONUS_STEP, recovery_chance, recovery_pass};
pub use running_game::{
    Pickoff, RunningPlay, attempt_pickoff, attempt_steals, pickoff_result, steal_chance,
};
pub use state::{GameRng, GameState, Scoreboard, Side, Team};
