//! Player state management.
//!
//! A player's live attributes are never edited directly. Injuries and the
//! team's riled-up bonus are recorded on the player, and [`Player::stats`]
//! is recomputed from the base attributes every time either changes.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Index of a player within their team's roster.
pub type RosterIndex = usize;

/// Half-innings a knocked-out player sits before becoming active again.
pub const KNOCKOUT_HALVES: u32 = 5;

/// Pitching stamina floor, in innings pitched.
pub const BASE_STINT: u32 = 4;

/// Pitching stamina ceiling.
pub const MAX_STINT: u32 = 12;

/// The eight player attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Raw strength; drives home-run power and recovery.
    pub power: i32,
    /// Speed; widens the hit windows and fuels outfield assists.
    pub agility: i32,
    /// Nerve; drives bunts, steals and plate discipline.
    pub chutzpah: i32,
    /// Hitting skill.
    pub batting: i32,
    /// Pitching skill.
    pub pitching: i32,
    /// Running skill.
    pub baserunning: i32,
    /// Defensive skill.
    pub fielding: i32,
    /// Fighting skill.
    pub brawling: i32,
}

impl Stats {
    /// Apply `f` to every attribute.
    #[must_use]
    pub fn map(self, f: impl Fn(i32) -> i32) -> Self {
        Self {
            power: f(self.power),
            agility: f(self.agility),
            chutzpah: f(self.chutzpah),
            batting: f(self.batting),
            pitching: f(self.pitching),
            baserunning: f(self.baserunning),
            fielding: f(self.fielding),
            brawling: f(self.brawling),
        }
    }
}

/// Lingering injury that debuffs every attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Injury {
    /// Minor: -2 to every stat.
    Winded,
    /// Moderate: -4 to every stat.
    ShookUp,
    /// Severe: -8 to every stat.
    Injured,
}

impl Injury {
    /// Points subtracted from every base attribute.
    #[must_use]
    pub const fn debuff(self) -> i32 {
        match self {
            Self::Winded => 2,
            Self::ShookUp => 4,
            Self::Injured => 8,
        }
    }

    /// The next milder injury, or `None` once healed.
    #[must_use]
    pub const fn milder(self) -> Option<Self> {
        match self {
            Self::Injured => Some(Self::ShookUp),
            Self::ShookUp => Some(Self::Winded),
            Self::Winded => None,
        }
    }
}

impl fmt::Display for Injury {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winded => write!(f, "Winded"),
            Self::ShookUp => write!(f, "Shook Up"),
            Self::Injured => write!(f, "Injured"),
        }
    }
}

/// State for a single player.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// Attributes as loaded from the roster.
    base: Stats,
    /// Attributes after injuries and buffs.
    live: Stats,
    /// Dead players stay on the roster for narration.
    pub is_dead: bool,
    /// Fatally hurt, not yet finalized.
    pub pending_death: bool,
    /// A dead player gets called to the plate one last time.
    pub final_bat_allowed: bool,
    /// Current injury, if any.
    injury: Option<Injury>,
    /// Half-innings left on the bench after a knockout.
    pub knockout_halves_remaining: u32,
    /// Accumulated patience from failed recovery attempts.
    pub recovery_bonus: f64,
    /// Last riled-up bonus folded into the live stats.
    riled_buff: i32,
    /// Innings left before the arm gives out.
    pub remaining_innings: u32,
    /// Pitched out for now.
    pub exhausted: bool,
}

impl Player {
    /// Create a healthy player. The pitching stint is set without the odd-agility coin flip.
    #[must_use]
    pub fn new(name: impl Into<String>, base: Stats) -> Self {
        Self {
            name: name.into(),
            base,
            live: base,
            is_dead: false,
            pending_death: false,
            final_bat_allowed: false,
            injury: None,
            knockout_halves_remaining: 0,
            recovery_bonus: 0.0,
            riled_buff: 0,
            remaining_innings: pitching_stint(base.agility, false),
            exhausted: false,
        }
    }

    /// Base attributes.
    #[must_use]
    pub const fn base_stats(&self) -> Stats {
        self.base
    }

    /// Live attributes.
    #[must_use]
    pub const fn stats(&self) -> Stats {
        self.live
    }

    /// Current injury, if any.
    #[must_use]
    pub const fn injury(&self) -> Option<Injury> {
        self.injury
    }

    /// Points currently subtracted by the injury.
    #[must_use]
    pub fn injury_debuff(&self) -> i32 {
        self.injury.map_or(0, Injury::debuff)
    }

    /// Riled-up bonus currently folded into the live stats.
    #[must_use]
    pub const fn riled_buff(&self) -> i32 {
        self.riled_buff
    }

    /// Whether the player can take the field or the plate.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        if self.is_dead && !self.final_bat_allowed {
            return false;
        }
        self.knockout_halves_remaining == 0
    }

    /// Whether the player is sitting out a knockout.
    #[must_use]
    pub const fn is_knocked_out(&self) -> bool {
        self.knockout_halves_remaining > 0
    }

    /// Defensive value; inactive fielders contribute nothing.
    #[must_use]
    pub const fn fielding_score(&self) -> i32 {
        if self.is_active() {
            self.live.fielding
        } else {
            0
        }
    }

    /// Set or clear the injury and rederive the live stats.
    pub fn set_injury(&mut self, injury: Option<Injury>) {
        self.injury = injury;
        self.recompute();
    }

    /// Fold in a new riled-up bonus, replacing whatever was applied before.
    pub fn set_riled_buff(&mut self, bonus: i32) {
        self.riled_buff = bonus;
        self.recompute();
    }

    /// Rederive live stats from base stats, injury and riled bonus.
    pub fn recompute(&mut self) {
        let debuff = self.injury_debuff();
        let buff = self.riled_buff;
        self.live = self.base.map(|value| (value - debuff).max(0) + buff);
    }

    /// Turn a pending death into a real one, leaving one final trip to the plate.
    pub fn finalize_death(&mut self) {
        if self.pending_death {
            self.pending_death = false;
            self.is_dead = true;
            self.final_bat_allowed = true;
        }
    }

    /// Roll a fresh pitching stint and clear exhaustion.
    pub fn roll_stint<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let coin = rng.gen_bool(0.5);
        self.remaining_innings = pitching_stint(self.base.agility, coin);
        self.exhausted = false;
    }

    /// Burn one inning of stamina.
    pub fn tire(&mut self) {
        self.remaining_innings = self.remaining_innings.saturating_sub(1);
        if self.remaining_innings == 0 {
            self.exhausted = true;
        }
    }

    /// Name plus any visible status, e.g. `Vera Knox (Winded; knocked out)`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut statuses: Vec<String> = Vec::new();
        if let Some(injury) = self.injury {
            statuses.push(injury.to_string());
        }
        if !self.pending_death {
            if self.is_dead {
                statuses.push("dead".to_string());
            } else if self.is_knocked_out() {
                statuses.push("knocked out".to_string());
            }
        }
        if statuses.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, statuses.join("; "))
        }
    }
}

/// Innings a pitcher lasts: `4 + agility / 2`, one more on a coin flip when agility is odd.
#[must_use]
pub fn pitching_stint(agility: i32, coin: bool) -> u32 {
    let agility = u32::try_from(agility.max(0)).unwrap_or(0);
    let mut bonus = agility / 2;
    if agility % 2 == 1 && coin {
        bonus += 1;
    }
    (BASE_STINT + bonus).min(MAX_STINT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(value: i32) -> Stats {
        Stats::default().map(|_| value)
    }

    #[test]
    fn test_player_creation() {
        let player = Player::new("Vera Knox", stats(5));
        assert_eq!(player.stats(), stats(5));
        assert!(player.is_active());
        assert_eq!(player.injury(), None);
        assert_eq!(player.riled_buff(), 0);
        assert_eq!(player.remaining_innings, 6);
    }

    #[test]
    fn test_injury_debuff_floors_at_zero() {
        let mut player = Player::new("Vera Knox", stats(5));
        player.set_injury(Some(Injury::Injured));
        assert_eq!(player.stats(), stats(0));
        assert_eq!(player.injury_debuff(), 8);

        player.set_injury(Some(Injury::Winded));
        assert_eq!(player.stats(), stats(3));

        player.set_injury(None);
        assert_eq!(player.stats(), stats(5));
    }

    #[test]
    fn test_riled_buff_does_not_stack() {
        let mut player = Player::new("Vera Knox", stats(5));
        player.set_riled_buff(4);
        assert_eq!(player.stats(), stats(9));
        player.set_riled_buff(2);
        assert_eq!(player.stats(), stats(7));
        player.set_riled_buff(2);
        assert_eq!(player.stats(), stats(7));
    }

    #[test]
    fn test_buff_applies_after_debuff() {
        let mut player = Player::new("Vera Knox", stats(3));
        player.set_injury(Some(Injury::ShookUp));
        player.set_riled_buff(2);
        assert_eq!(player.stats(), stats(2));
    }

    #[test]
    fn test_knocked_out_player_is_inactive() {
        let mut player = Player::new("Vera Knox", stats(7));
        player.knockout_halves_remaining = KNOCKOUT_HALVES;
        assert!(!player.is_active());
        assert_eq!(player.fielding_score(), 0);
        assert_eq!(player.display_name(), "Vera Knox (knocked out)");
    }

    #[test]
    fn test_death_lifecycle() {
        let mut player = Player::new("Vera Knox", stats(7));
        player.pending_death = true;
        assert!(player.is_active());
        assert_eq!(player.display_name(), "Vera Knox");

        player.finalize_death();
        assert!(player.is_dead);
        assert!(player.final_bat_allowed);
        assert!(player.is_active());

        player.final_bat_allowed = false;
        assert!(!player.is_active());
        assert_eq!(player.display_name(), "Vera Knox (dead)");
    }

    #[test]
    fn test_pitching_stint() {
        assert_eq!(pitching_stint(0, true), 4);
        assert_eq!(pitching_stint(5, false), 6);
        assert_eq!(pitching_stint(5, true), 7);
        assert_eq!(pitching_stint(6, true), 7);
        assert_eq!(pitching_stint(30, false), MAX_STINT);
    }

    #[test]
    fn test_tire_exhausts() {
        let mut player = Player::new("Vera Knox", stats(0));
        assert_eq!(player.remaining_innings, 4);
        for _ in 0..3 {
            player.tire();
            assert!(!player.exhausted);
        }
        player.tire();
        assert!(player.exhausted);
        player.tire();
        assert_eq!(player.remaining_innings, 0);
    }
}
