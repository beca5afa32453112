//! Defensive assignments and base coverage.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::bases::Base;
use crate::game::player::{Player, RosterIndex};

/// Fielding positions other than pitcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Covers home plate.
    Catcher,
    /// Covers first.
    FirstBase,
    /// Covers second.
    SecondBase,
    /// Covers third.
    ThirdBase,
    /// Runs down ground balls.
    Shortstop,
    /// Outfield, left.
    LeftField,
    /// Outfield, center.
    CenterField,
    /// Outfield, right.
    RightField,
}

impl Position {
    /// Fill order when assigning from a shuffled roster.
    pub const ALL: [Self; 8] = [
        Self::Catcher,
        Self::FirstBase,
        Self::SecondBase,
        Self::ThirdBase,
        Self::Shortstop,
        Self::LeftField,
        Self::CenterField,
        Self::RightField,
    ];

    /// Outfield positions, the ones that can throw an assist.
    pub const OUTFIELD: [Self; 3] = [Self::LeftField, Self::CenterField, Self::RightField];

    const fn slot(self) -> usize {
        match self {
            Self::Catcher => 0,
            Self::FirstBase => 1,
            Self::SecondBase => 2,
            Self::ThirdBase => 3,
            Self::Shortstop => 4,
            Self::LeftField => 5,
            Self::CenterField => 6,
            Self::RightField => 7,
        }
    }

    /// Position responsible for tags at `base`.
    #[must_use]
    pub const fn covering(base: Base) -> Self {
        match base {
            Base::First => Self::FirstBase,
            Base::Second => Self::SecondBase,
            Base::Third => Self::ThirdBase,
            Base::Home => Self::Catcher,
        }
    }

    /// Title used when a fielder is named in play-by-play.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Catcher => "catcher",
            Self::FirstBase => "first base",
            Self::SecondBase => "second base",
            Self::ThirdBase => "third base",
            Self::Shortstop => "shortstop",
            Self::LeftField => "left fielder",
            Self::CenterField => "center fielder",
            Self::RightField => "right fielder",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The fielding team's assignment for one inning.
///
/// Every non-pitcher is assigned, active or not, so the narration can
/// mention a dead shortstop. Inactive fielders contribute nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defense {
    /// The pitcher's roster index.
    pub pitcher: RosterIndex,
    slots: [Option<RosterIndex>; 8],
}

impl Defense {
    /// Shuffle everyone but the pitcher into the eight positions.
    ///
    /// Short rosters leave the last positions empty.
    pub fn assign<R: Rng + ?Sized>(roster_len: usize, pitcher: RosterIndex, rng: &mut R) -> Self {
        let mut pool: Vec<RosterIndex> = (0..roster_len).filter(|&i| i != pitcher).collect();
        pool.shuffle(rng);
        let mut slots = [None; 8];
        for slot in &mut slots {
            *slot = pool.pop();
        }
        Self { pitcher, slots }
    }

    /// Build a defense from explicit slots, in [`Position::ALL`] order.
    #[must_use]
    pub const fn from_slots(pitcher: RosterIndex, slots: [Option<RosterIndex>; 8]) -> Self {
        Self { pitcher, slots }
    }

    /// Who plays `position`.
    #[must_use]
    pub const fn at(&self, position: Position) -> Option<RosterIndex> {
        self.slots[position.slot()]
    }

    /// Everyone assigned, pitcher excluded.
    pub fn fielders(&self) -> impl Iterator<Item = (Position, RosterIndex)> + '_ {
        Position::ALL
            .into_iter()
            .filter_map(|position| self.at(position).map(|idx| (position, idx)))
    }
}

/// Defensive contribution: zero for an empty or inactive position.
#[must_use]
pub fn fielder_score(roster: &[Player], fielder: Option<RosterIndex>) -> i32 {
    fielder
        .and_then(|idx| roster.get(idx))
        .map_or(0, Player::fielding_score)
}

/// Who defends a base on a given play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    /// The position that normally covers the base.
    pub position: Position,
    /// Whoever plays that position.
    pub primary: Option<RosterIndex>,
    /// Why the primary can't make the play, when they can't.
    pub primary_status: Option<String>,
    /// An outfielder who beat the primary to the ball.
    pub assist: Option<(Position, RosterIndex)>,
}

impl Coverage {
    /// The defender who actually makes the play, if anyone active can.
    #[must_use]
    pub fn active_defender(&self, roster: &[Player]) -> Option<RosterIndex> {
        if let Some((_, idx)) = self.assist {
            return Some(idx);
        }
        self.primary
            .filter(|&idx| roster.get(idx).is_some_and(Player::is_active))
    }
}

/// Work out coverage for `base`, rolling for an outfield assist.
///
/// A random active outfielder tries with probability `max(agility / 10, 0.05)`
/// and takes over when `d100 + agility` beats the primary's `d100` (zero if
/// the primary can't play).
pub fn cover_base<R: Rng + ?Sized>(
    defense: &Defense,
    roster: &[Player],
    base: Base,
    rng: &mut R,
) -> Coverage {
    let position = Position::covering(base);
    let primary = defense.at(position);
    let primary_player = primary.and_then(|idx| roster.get(idx));
    let primary_active = primary_player.is_some_and(Player::is_active);

    let primary_status = match primary_player {
        Some(player) if !primary_active => Some(if player.is_dead {
            format!("{} is dead", player.name)
        } else if player.is_knocked_out() {
            format!("{} is knocked out", player.name)
        } else {
            format!("{} is nowhere to be found", player.display_name())
        }),
        _ => None,
    };

    let outfielders: Vec<(Position, RosterIndex)> = Position::OUTFIELD
        .into_iter()
        .filter_map(|pos| defense.at(pos).map(|idx| (pos, idx)))
        .filter(|&(_, idx)| roster.get(idx).is_some_and(Player::is_active))
        .collect();

    let mut assist = None;
    if let Some(&(pos, idx)) = outfielders.choose(rng) {
        let agility = roster.get(idx).map_or(0, |p| p.stats().agility);
        let attempt = (f64::from(agility) / 10.0).max(0.05);
        if rng.gen_range(0.0..1.0) <= attempt {
            let assist_roll = rng.gen_range(1..=100) + agility;
            let primary_roll = if primary_active {
                rng.gen_range(1..=100)
            } else {
                0
            };
            if assist_roll > primary_roll {
                assist = Some((pos, idx));
            }
        }
    }

    Coverage {
        position,
        primary,
        primary_status,
        assist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::{KNOCKOUT_HALVES, Stats};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player::new(format!("Fielder {i}"), Stats::default().map(|_| 5)))
            .collect()
    }

    #[test]
    fn test_assign_skips_pitcher() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let defense = Defense::assign(9, 4, &mut rng);
        assert_eq!(defense.pitcher, 4);
        let mut assigned: Vec<_> = defense.fielders().map(|(_, idx)| idx).collect();
        assigned.sort_unstable();
        assert_eq!(assigned, vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_short_roster_leaves_gaps() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let defense = Defense::assign(4, 0, &mut rng);
        assert_eq!(defense.fielders().count(), 3);
        assert_eq!(defense.at(Position::RightField), None);
    }

    #[test]
    fn test_inactive_fielder_scores_zero() {
        let mut players = roster(2);
        assert_eq!(fielder_score(&players, Some(1)), 5);
        players[1].knockout_halves_remaining = KNOCKOUT_HALVES;
        assert_eq!(fielder_score(&players, Some(1)), 0);
        assert_eq!(fielder_score(&players, None), 0);
    }

    #[test]
    fn test_dead_primary_is_reported() {
        let mut players = roster(9);
        let defense = Defense::from_slots(
            0,
            [Some(1), Some(2), Some(3), Some(4), Some(5), None, None, None],
        );
        players[3].is_dead = true;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let coverage = cover_base(&defense, &players, Base::Second, &mut rng);
        assert_eq!(coverage.position, Position::SecondBase);
        assert_eq!(coverage.primary, Some(3));
        assert_eq!(coverage.primary_status.as_deref(), Some("Fielder 3 is dead"));
        assert_eq!(coverage.assist, None);
        assert_eq!(coverage.active_defender(&players), None);
    }

    #[test]
    fn test_catcher_covers_home() {
        let players = roster(9);
        let defense = Defense::from_slots(
            0,
            [Some(8), Some(2), Some(3), Some(4), Some(5), None, None, None],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let coverage = cover_base(&defense, &players, Base::Home, &mut rng);
        assert_eq!(coverage.primary, Some(8));
        assert_eq!(coverage.primary_status, None);
        assert_eq!(coverage.active_defender(&players), Some(8));
    }
}
