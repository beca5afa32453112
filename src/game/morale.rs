//! Morale: the shared foul mood and each team's riled-up comeback bonus.

use serde::Serialize;

/// Brawl-chance bonus per foul mood level.
pub const FOUL_MOOD_TIERS: [i32; 5] = [0, 10, 25, 50, 80];

/// Highest riled-up tier.
pub const MAX_RILED_TIER: u8 = 5;

/// Game-wide irritation built up by repeated fouls.
///
/// The first foul of an at-bat is free; every further foul in the same
/// at-bat raises the persistent level. Only a brawl clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FoulMood {
    level: usize,
    fouls_this_at_bat: u32,
}

impl FoulMood {
    /// A calm mood.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: 0,
            fouls_this_at_bat: 0,
        }
    }

    /// Current level index into [`FOUL_MOOD_TIERS`].
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Record a pitch result. Returns `true` when the level rose.
    pub fn update(&mut self, is_foul: bool) -> bool {
        if !is_foul {
            return false;
        }
        self.fouls_this_at_bat += 1;
        if self.fouls_this_at_bat > 1 && self.level < FOUL_MOOD_TIERS.len() - 1 {
            self.level += 1;
            return true;
        }
        false
    }

    /// Bonus added to every brawl chance.
    #[must_use]
    pub fn bonus(&self) -> i32 {
        FOUL_MOOD_TIERS.get(self.level).copied().unwrap_or(0)
    }

    /// Announcement for the current level.
    #[must_use]
    pub fn message(&self) -> String {
        match self.bonus() {
            10 => "Both teams are in a Foul Mood. 🐔".to_string(),
            25 => "Both teams are in a Very Foul Mood. 🐔🐔".to_string(),
            50 => "Both teams are in an Extremely Foul Mood. 🐔🐔🐔".to_string(),
            80 => "Both teams are in the DANKEST OF FOUL MOODS!!! 🐔🐔🐔🐔".to_string(),
            bonus => format!("Foul Mood = {bonus}"),
        }
    }

    /// Forget the fouls of the previous at-bat.
    pub fn reset_per_at_bat(&mut self) {
        self.fouls_this_at_bat = 0;
    }

    /// Clear everything.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// A team's comeback state, tier 0 through [`MAX_RILED_TIER`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiledUp {
    tier: u8,
}

impl RiledUp {
    /// Current tier.
    #[must_use]
    pub const fn tier(&self) -> u8 {
        self.tier
    }

    /// Flat bonus to every stat of every player on the team.
    #[must_use]
    pub fn bonus(&self) -> i32 {
        i32::from(self.tier) * 2
    }

    /// Raise the tier, capped at the maximum.
    pub fn increase(&mut self, amount: u8) {
        self.tier = self.tier.saturating_add(amount).min(MAX_RILED_TIER);
    }

    /// Lower the tier, floored at zero.
    pub fn decrease(&mut self, amount: u8) {
        self.tier = self.tier.saturating_sub(amount);
    }

    /// Status line for the current tier.
    #[must_use]
    pub fn message(&self, team_name: &str) -> String {
        if self.tier == 0 {
            format!("{team_name} are calm.")
        } else {
            format!("{team_name} are getting Riled Up! {}", fires(self.tier))
        }
    }

    /// End-of-half check: a deficit of at least `threshold` runs raises the tier.
    pub fn trigger_by_deficit(
        &mut self,
        deficit: u32,
        threshold: u32,
        team_name: &str,
    ) -> Option<String> {
        if deficit < threshold {
            return None;
        }
        self.increase(1);
        Some(format!(
            "Falling behind by {deficit} runs, {}",
            self.message(team_name)
        ))
    }

    /// Scoring lowers the tier by one.
    pub fn reduce_on_score(&mut self, team_name: &str) -> Option<String> {
        if self.tier == 0 {
            return None;
        }
        self.decrease(1);
        if self.tier == 0 {
            Some(format!(
                "Scoring points soothes {team_name}'s frustration completely. Riled all the way down. 💧"
            ))
        } else {
            Some(format!(
                "Scoring points calms {team_name}'s frustration. Riled down to {}",
                fires(self.tier)
            ))
        }
    }
}

fn fires(tier: u8) -> String {
    "🔥".repeat(usize::from(tier))
}
