//! Game invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger in a correctly implemented game. They are
//! checked after every plate appearance; debug builds panic on a
//! violation and release builds log it.

use crate::game::bases::Bases;
use crate::game::morale::MAX_RILED_TIER;
use crate::game::state::{GameState, Side};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants for `state`, with `bases` holding `batting`'s runners.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState, batting: Side, bases: &Bases) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut fail = |message: String| violations.push(InvariantViolation { message });

    let runners: Vec<_> = bases.runners().collect();
    for (i, &(base, runner)) in runners.iter().enumerate() {
        if runners[..i].iter().any(|&(_, other)| other == runner) {
            fail(format!("runner {runner} occupies more than one base ({base})"));
        }
    }

    for side in Side::BOTH {
        let team = state.team(side);

        if team.riled.tier() > MAX_RILED_TIER {
            fail(format!(
                "{} riled tier {} exceeds {MAX_RILED_TIER}",
                team.name,
                team.riled.tier()
            ));
        }

        let bonus = team.riled.bonus();
        for player in &team.players {
            if player.riled_buff() != bonus {
                fail(format!(
                    "{} carries riled buff {} but {} are at {bonus}",
                    player.name,
                    player.riled_buff(),
                    team.name
                ));
            }

            let mut fresh = player.clone();
            fresh.recompute();
            if fresh.stats() != player.stats() {
                fail(format!(
                    "{} live stats drifted from base, injury and buff",
                    player.name
                ));
            }

            if player.is_dead && player.pending_death {
                fail(format!("{} is both dead and pending death", player.name));
            }
        }
    }

    let roster = &state.team(batting).players;
    for &(base, runner) in &runners {
        match roster.get(runner) {
            None => fail(format!("runner {runner} on {base} is not on the roster")),
            Some(player) if !player.is_active() => {
                fail(format!("{} stands on {base} while inactive", player.name));
            }
            Some(_) => {}
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState, batting: Side, bases: &Bases) {
    let violations = check_invariants(state, batting, bases);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// Logs violations in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(state: &GameState, batting: Side, bases: &Bases) {
    for violation in check_invariants(state, batting, bases) {
        tracing::error!(%violation, "game invariant violated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bases::Base;
    use crate::game::player::{Injury, Player, Stats};
    use crate::game::state::Team;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_valid_game() -> GameState {
        let team = |name: &str| {
            let players = (0..9)
                .map(|i| Player::new(format!("{name} {i}"), Stats::default().map(|_| 5)))
                .collect();
            Team::new(name, players)
        };
        GameState::new(
            team("Scorpions"),
            team("Aether"),
            ChaCha8Rng::seed_from_u64(0),
        )
    }

    #[test]
    fn test_valid_game_passes() {
        let mut state = create_valid_game();
        state.teams[0].players[2].set_injury(Some(Injury::ShookUp));
        state.teams[1].riled.increase(3);
        state.teams[1].apply_riled_buff();
        let mut bases = Bases::empty();
        bases.set(Base::First, Some(1));
        bases.set(Base::Third, Some(8));
        assert!(check_invariants(&state, Side::Away, &bases).is_empty());
    }

    #[test]
    fn test_duplicate_runner_detected() {
        let state = create_valid_game();
        let mut bases = Bases::empty();
        bases.set(Base::First, Some(3));
        bases.set(Base::Second, Some(3));
        let violations = check_invariants(&state, Side::Away, &bases);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("more than one base"));
    }

    #[test]
    fn test_unknown_runner_detected() {
        let state = create_valid_game();
        let mut bases = Bases::empty();
        bases.set(Base::Second, Some(42));
        let violations = check_invariants(&state, Side::Away, &bases);
        assert!(violations.iter().any(|v| v.message.contains("not on the roster")));
    }

    #[test]
    fn test_stale_riled_buff_detected() {
        let mut state = create_valid_game();
        state.teams[0].riled.increase(1);
        let violations = check_invariants(&state, Side::Home, &Bases::empty());
        assert_eq!(violations.len(), 9);
        assert!(violations[0].to_string().starts_with("Invariant violation: "));
    }

    #[test]
    fn test_dead_and_pending_detected() {
        let mut state = create_valid_game();
        state.teams[1].players[0].is_dead = true;
        state.teams[1].players[0].pending_death = true;
        let violations = check_invariants(&state, Side::Home, &Bases::empty());
        assert_eq!(violations.len(), 1);
    }

    #[test]
    #[should_panic(expected = "Game invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_panics_in_debug() {
        let state = create_valid_game();
        let mut bases = Bases::empty();
        bases.set(Base::First, Some(0));
        bases.set(Base::Third, Some(0));
        assert_invariants(&state, Side::Away, &bases);
    }
}
