//! Base occupancy and the small count displays that go with it.

use std::fmt;

use serde::Serialize;

use crate::game::player::RosterIndex;

/// A base a runner can stand on or run to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Base {
    /// First base.
    First,
    /// Second base.
    Second,
    /// Third base.
    Third,
    /// Home plate.
    Home,
}

impl Base {
    /// The three bases a runner can occupy, in order.
    pub const OCCUPIABLE: [Self; 3] = [Self::First, Self::Second, Self::Third];

    /// Slot index: 0 for first through 3 for home.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Home => 3,
        }
    }

    /// The next base along the path; home stays home.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::Third,
            Self::Third | Self::Home => Self::Home,
        }
    }

    /// The base before this one, or `None` from first.
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self {
            Self::First => None,
            Self::Second => Some(Self::First),
            Self::Third => Some(Self::Second),
            Self::Home => Some(Self::Third),
        }
    }

    /// Name used in play-by-play.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::First => "first base",
            Self::Second => "second base",
            Self::Third => "third base",
            Self::Home => "home plate",
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runners on first, second and third.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bases([Option<RosterIndex>; 3]);

impl Bases {
    /// Empty bases.
    #[must_use]
    pub const fn empty() -> Self {
        Self([None; 3])
    }

    /// Who stands on `base`. Home is never occupied.
    #[must_use]
    pub fn get(&self, base: Base) -> Option<RosterIndex> {
        self.0.get(base.index()).copied().flatten()
    }

    /// Put `runner` on `base` (or clear it with `None`). Home is ignored.
    pub fn set(&mut self, base: Base, runner: Option<RosterIndex>) {
        if let Some(slot) = self.0.get_mut(base.index()) {
            *slot = runner;
        }
    }

    /// Clear `base`, returning whoever stood there.
    pub fn take(&mut self, base: Base) -> Option<RosterIndex> {
        self.0.get_mut(base.index()).and_then(Option::take)
    }

    /// Whether `base` is occupied.
    #[must_use]
    pub fn is_occupied(&self, base: Base) -> bool {
        self.get(base).is_some()
    }

    /// Number of runners on base.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.0.iter().flatten().count()
    }

    /// Whether every base is occupied.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.occupied_count() == 3
    }

    /// Runners with their bases, first to third.
    pub fn runners(&self) -> impl Iterator<Item = (Base, RosterIndex)> + '_ {
        Base::OCCUPIABLE
            .into_iter()
            .filter_map(|base| self.get(base).map(|runner| (base, runner)))
    }

    /// Base held by `runner`, if any.
    #[must_use]
    pub fn position_of(&self, runner: RosterIndex) -> Option<Base> {
        self.runners()
            .find(|&(_, idx)| idx == runner)
            .map(|(base, _)| base)
    }

    /// Remove runners for whom `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(RosterIndex) -> bool) {
        for slot in &mut self.0 {
            if slot.is_some_and(|runner| !keep(runner)) {
                *slot = None;
            }
        }
    }

    /// Walk or hit-by-pitch: push the batter onto first, forcing runners ahead.
    ///
    /// Returns the runner forced home, if the bases were loaded.
    pub fn force_batter(&mut self, batter: RosterIndex) -> Option<RosterIndex> {
        let Some(on_first) = self.get(Base::First) else {
            self.set(Base::First, Some(batter));
            return None;
        };
        let mut scored = None;
        if let Some(on_second) = self.get(Base::Second) {
            scored = self.get(Base::Third);
            self.set(Base::Third, Some(on_second));
        }
        self.set(Base::Second, Some(on_first));
        self.set(Base::First, Some(batter));
        scored
    }

    /// Balk: every runner moves up one. Returns the runner who scored from third.
    pub fn advance_all(&mut self) -> Option<RosterIndex> {
        let scored = self.get(Base::Third);
        self.0 = [None, self.get(Base::First), self.get(Base::Second)];
        scored
    }
}

impl fmt::Display for Bases {
    /// Third, second, first, left to right.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in [Base::Third, Base::Second, Base::First] {
            f.write_str(if self.is_occupied(base) { "🟩" } else { "⬜" })?;
        }
        Ok(())
    }
}

/// Count display such as `(B2/S-/O1)`.
#[must_use]
pub fn format_bso(balls: u32, strikes: u32, outs: u32) -> String {
    fn part(label: char, value: u32) -> String {
        if value == 0 {
            format!("{label}-")
        } else {
            format!("{label}{value}")
        }
    }
    format!(
        "({}/{}/{})",
        part('B', balls),
        part('S', strikes),
        part('O', outs)
    )
}
