//! Game state management.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::game::morale::{FoulMood, RiledUp};
use crate::game::player::{Player, RosterIndex};

/// The random source every game owns.
pub type GameRng = ChaCha8Rng;

/// Which team, by billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bats first.
    Away,
    /// Bats second.
    Home,
}

impl Side {
    /// Both sides, away first.
    pub const BOTH: [Self; 2] = [Self::Away, Self::Home];

    /// Index into per-side arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Away => 0,
            Self::Home => 1,
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Away => Self::Home,
            Self::Home => Self::Away,
        }
    }
}

/// A named roster plus the team's comeback state.
#[derive(Debug, Clone)]
pub struct Team {
    /// Team name, used in every line of narration.
    pub name: String,
    /// Players in roster order.
    pub players: Vec<Player>,
    /// Riled-up tier.
    pub riled: RiledUp,
}

impl Team {
    /// A calm team.
    #[must_use]
    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            name: name.into(),
            players,
            riled: RiledUp::default(),
        }
    }

    /// Whether anyone can still play.
    #[must_use]
    pub fn has_active(&self) -> bool {
        self.players.iter().any(Player::is_active)
    }

    /// Push the current riled bonus into every player's live stats.
    pub fn apply_riled_buff(&mut self) {
        let bonus = self.riled.bonus();
        for player in &mut self.players {
            player.set_riled_buff(bonus);
        }
    }

    /// Finalize every pending death on the roster.
    pub fn finalize_pending_deaths(&mut self) {
        for player in &mut self.players {
            player.finalize_death();
        }
    }

    /// Number of dead players.
    #[must_use]
    pub fn deaths(&self) -> usize {
        self.players.iter().filter(|p| p.is_dead).count()
    }

    /// Highest-pitching active arm with stamina left.
    #[must_use]
    pub fn best_rested_pitcher(&self) -> Option<RosterIndex> {
        let mut best: Option<(RosterIndex, i32)> = None;
        for (idx, player) in self.players.iter().enumerate() {
            if !player.is_active() || player.exhausted {
                continue;
            }
            let pitching = player.stats().pitching;
            if best.is_none_or(|(_, top)| pitching > top) {
                best = Some((idx, pitching));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Roll a fresh pitching stint for every player.
    pub fn roll_stints<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for player in &mut self.players {
            player.roll_stint(rng);
        }
    }

    /// Whether every player has pitched themselves out.
    #[must_use]
    pub fn all_exhausted(&self) -> bool {
        self.players.iter().all(|p| p.exhausted)
    }
}

/// Runs per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    /// Away runs.
    pub away: u32,
    /// Home runs.
    pub home: u32,
}

impl Scoreboard {
    /// Runs for `side`.
    #[must_use]
    pub const fn get(&self, side: Side) -> u32 {
        match side {
            Side::Away => self.away,
            Side::Home => self.home,
        }
    }

    /// Add runs; scores only ever go up.
    pub fn add(&mut self, side: Side, runs: u32) {
        match side {
            Side::Away => self.away += runs,
            Side::Home => self.home += runs,
        }
    }

    /// The side ahead, if any.
    #[must_use]
    pub fn leader(&self) -> Option<Side> {
        match self.away.cmp(&self.home) {
            std::cmp::Ordering::Greater => Some(Side::Away),
            std::cmp::Ordering::Less => Some(Side::Home),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// How far `side` trails, zero when level or ahead.
    #[must_use]
    pub fn deficit(&self, side: Side) -> u32 {
        self.get(side.opponent()).saturating_sub(self.get(side))
    }
}

/// Everything that changes during a game.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Away then home.
    pub teams: [Team; 2],
    /// Current score.
    pub score: Scoreboard,
    /// Shared foul mood.
    pub foul_mood: FoulMood,
    /// Game-owned random source.
    pub rng: GameRng,
}

impl GameState {
    /// Fresh state for a matchup.
    #[must_use]
    pub fn new(away: Team, home: Team, rng: GameRng) -> Self {
        Self {
            teams: [away, home],
            score: Scoreboard::default(),
            foul_mood: FoulMood::new(),
            rng,
        }
    }

    /// The team batting or fielding as `side`.
    #[must_use]
    pub const fn team(&self, side: Side) -> &Team {
        &self.teams[side.index()]
    }

    /// Mutable access to a team.
    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        &mut self.teams[side.index()]
    }

    /// A player by side and roster index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is outside the roster; indices come from the roster itself.
    #[must_use]
    pub fn player(&self, side: Side, idx: RosterIndex) -> &Player {
        &self.teams[side.index()].players[idx]
    }

    /// Mutable access to a player.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is outside the roster.
    pub fn player_mut(&mut self, side: Side, idx: RosterIndex) -> &mut Player {
        &mut self.teams[side.index()].players[idx]
    }

    /// Roll 1 through 100.
    pub fn d100(&mut self) -> i32 {
        self.rng.gen_range(1..=100)
    }

    /// Roll `low` through `high`, inclusive.
    pub fn roll_range(&mut self, low: i32, high: i32) -> i32 {
        self.rng.gen_range(low..=high)
    }

    /// True with probability `p`, clamped to `[0, 1]`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// `📊 Current Score: Away: 1, Home: 0`
    #[must_use]
    pub fn score_line(&self) -> String {
        format!(
            "📊 Current Score: {}: {}, {}: {}",
            self.teams[0].name, self.score.away, self.teams[1].name, self.score.home
        )
    }

    /// Credit runs to `side`. A run calms a riled team by one tier and the
    /// returned line announces it.
    pub fn credit_runs(&mut self, side: Side, runs: u32) -> Option<String> {
        if runs == 0 {
            return None;
        }
        self.score.add(side, runs);
        let team = self.team_mut(side);
        let name = team.name.clone();
        let message = team.riled.reduce_on_score(&name);
        if message.is_some() {
            team.apply_riled_buff();
        }
        message
    }
}
