//! Between-halves recovery for the walking wounded.

use rand::Rng;

use crate::game::player::{Injury, Player};
use crate::game::state::Team;

/// Patience gained per failed recovery attempt.
pub const RECOVERY_BONUS_STEP: f64 = 0.1;

/// Chance to step one tier along the recovery ladder.
#[must_use]
pub fn recovery_chance(player: &Player) -> f64 {
    let base = (f64::from(player.stats().power) / 5.0).max(0.1);
    (base + player.recovery_bonus).min(1.0)
}

/// Give every hurt, living player on `team` a chance to get better.
///
/// The ladder runs knocked out, injured, shook up, winded, healthy.
pub fn recovery_pass<R: Rng + ?Sized>(team: &mut Team, rng: &mut R) -> Vec<String> {
    let mut lines = Vec::new();
    for player in &mut team.players {
        if player.is_dead {
            continue;
        }
        let knocked_out = player.is_knocked_out();
        let Some(current) = current_tier(player) else {
            continue;
        };

        // 5% full recovery, checked first
        if rng.gen_range(1..=100) <= 5 {
            player.knockout_halves_remaining = 0;
            player.set_injury(None);
            player.recovery_bonus = 0.0;
            lines.push(format!(
                "💖 {} makes an extraordinary recovery and is fully healed!",
                player.name
            ));
            continue;
        }

        if rng.gen_range(0.0..1.0) >= recovery_chance(player) {
            player.recovery_bonus += RECOVERY_BONUS_STEP;
            continue;
        }

        let next = if knocked_out {
            player.knockout_halves_remaining = 0;
            Some(Injury::Injured)
        } else {
            player.injury().and_then(Injury::milder)
        };
        player.set_injury(next);
        player.recovery_bonus = 0.0;
        lines.push(match next {
            Some(milder) => format!("{} recovers from {current} to {milder}!", player.name),
            None => format!("💖 {} has fully recovered from {current}!", player.name),
        });
    }
    lines
}

fn current_tier(player: &Player) -> Option<String> {
    if player.is_knocked_out() {
        Some("Knocked Out".to_string())
    } else {
        player.injury().map(|injury| injury.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::{KNOCKOUT_HALVES, Stats};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team_of(players: Vec<Player>) -> Team {
        Team::new("Scorpions", players)
    }

    #[test]
    fn test_recovery_chance_floor_and_cap() {
        let weak = Player::new("Weak", Stats::default());
        assert!((recovery_chance(&weak) - 0.1).abs() < 1e-9);

        let mut strong = Player::new("Strong", Stats::default().map(|_| 10));
        assert!((recovery_chance(&strong) - 1.0).abs() < 1e-9);
        strong.recovery_bonus = 0.5;
        assert!((recovery_chance(&strong) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_healthy_players_are_untouched() {
        let mut team = team_of(vec![Player::new("Vera Knox", Stats::default())]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(recovery_pass(&mut team, &mut rng).is_empty());
        assert!((team.players[0].recovery_bonus).abs() < 1e-9);
    }

    #[test]
    fn test_strong_player_always_improves() {
        let mut player = Player::new("Vera Knox", Stats::default().map(|_| 10));
        player.set_injury(Some(Injury::Winded));
        let mut team = team_of(vec![player]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let lines = recovery_pass(&mut team, &mut rng);
        assert_eq!(lines.len(), 1);
        assert_eq!(team.players[0].injury(), None);
        assert_eq!(team.players[0].stats().power, 10);
    }

    #[test]
    fn test_knockout_steps_to_injured_or_heals() {
        for seed in 0..30 {
            let mut player = Player::new("Vera Knox", Stats::default().map(|_| 10));
            player.knockout_halves_remaining = KNOCKOUT_HALVES;
            let mut team = team_of(vec![player]);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            recovery_pass(&mut team, &mut rng);
            let player = &team.players[0];
            assert!(!player.is_knocked_out());
            assert!(matches!(player.injury(), None | Some(Injury::Injured)));
        }
    }

    #[test]
    fn test_failures_build_patience() {
        let mut player = Player::new("Vera Knox", Stats::default());
        player.set_injury(Some(Injury::Injured));
        let mut team = team_of(vec![player]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut halves = 0;
        while team.players[0].injury().is_some() && halves < 500 {
            recovery_pass(&mut team, &mut rng);
            halves += 1;
        }
        assert!(team.players[0].injury().is_none());
        assert!((team.players[0].recovery_bonus).abs() < 1e-9);
    }

    #[test]
    fn test_dead_players_are_skipped() {
        let mut player = Player::new("Vera Knox", Stats::default().map(|_| 10));
        player.set_injury(Some(Injury::Injured));
        player.is_dead = true;
        let mut team = team_of(vec![player]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(recovery_pass(&mut team, &mut rng).is_empty());
        assert_eq!(team.players[0].injury(), Some(Injury::Injured));
    }
}
