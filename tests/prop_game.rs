//! Property-based tests for game mechanics.
//!
//! These tests verify properties of plate appearances, baserunning and whole games.
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use basebrawl::game::{
    Base, Bases, Defense, GameRng, GameState, HalfInningContext, HitKind, casualty_counts,
    check_invariants, play_half_inning, resolve_hit,
};
use basebrawl::{Game, GameConfig, GameOutcome, Player, Side, Stats, Team};
use rand::SeedableRng;

fn stats_strategy() -> impl Strategy<Value = Stats> {
    prop::array::uniform8(0i32..=100).prop_map(|[a, b, c, d, e, f, g, h]| Stats {
        power: a,
        agility: b,
        chutzpah: c,
        batting: d,
        pitching: e,
        baserunning: f,
        fielding: g,
        brawling: h,
    })
}

fn roster_strategy() -> impl Strategy<Value = Vec<Stats>> {
    prop::collection::vec(stats_strategy(), 9)
}

fn team(name: &str, stats: &[Stats]) -> Team {
    let players = stats
        .iter()
        .enumerate()
        .map(|(i, &s)| Player::new(format!("{name} {i}"), s))
        .collect();
    Team::new(name, players)
}

fn defense() -> Defense {
    Defense::from_slots(
        0,
        [Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7), Some(8)],
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any pair of rosters plays to a consistent conclusion.
    #[test]
    fn prop_full_game_finishes(
        away in roster_strategy(),
        home in roster_strategy(),
        seed in any::<u64>(),
    ) {
        let config = GameConfig { seed: Some(seed), ..GameConfig::default() };
        let report = Game::new(config, team("Scorpions", &away), team("Aether", &home))
            .unwrap()
            .play();

        prop_assert!(report.innings >= 1);
        prop_assert!(report.innings <= config.max_innings);
        match report.outcome {
            GameOutcome::Winner { side } => {
                prop_assert_eq!(report.score.leader(), Some(side));
                prop_assert!(report.innings >= config.innings);
            }
            GameOutcome::Tie => {
                prop_assert_eq!(report.score.away, report.score.home);
                prop_assert_eq!(report.innings, config.max_innings);
            }
            GameOutcome::Forfeit { .. } => {}
        }
        prop_assert!(report.away_deaths <= 9);
        prop_assert!(report.home_deaths <= 9);
    }

    /// A half-inning ends on three or more outs unless the side forfeits,
    /// and only the batting side's score moves.
    #[test]
    fn prop_half_inning_terminates(
        away in roster_strategy(),
        home in roster_strategy(),
        seed in any::<u64>(),
    ) {
        let mut state = GameState::new(
            team("Scorpions", &away),
            team("Aether", &home),
            GameRng::seed_from_u64(seed),
        );
        let ctx = HalfInningContext {
            inning: 1,
            regulation: 9,
            riled_deficit: 3,
            suppress_riled: false,
        };
        let half = play_half_inning(&mut state, Side::Away, &defense(), ctx);

        prop_assert!(half.forfeit || half.outs >= 3);
        prop_assert!(half.outs <= 6);
        prop_assert!(!(half.mercy && half.forfeit));
        prop_assert_eq!(state.score.away, half.runs);
        prop_assert_eq!(state.score.home, 0);
        prop_assert!(check_invariants(&state, Side::Away, &Bases::empty()).is_empty());
    }

    /// Home runs clear the bases and score every runner plus the batter.
    #[test]
    fn prop_home_run_scores_occupied_plus_one(
        occupied in prop::array::uniform3(any::<bool>()),
        outs in 0u32..3,
        near_miss in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let stats = Stats::default().map(|_| 5);
        let mut state = GameState::new(
            team("Scorpions", &[stats; 9]),
            team("Aether", &[stats; 9]),
            GameRng::seed_from_u64(seed),
        );
        let mut bases = Bases::empty();
        for (base, on) in Base::OCCUPIABLE.into_iter().zip(occupied) {
            if on {
                bases.set(base, Some(base.index() + 1));
            }
        }
        let kind = if near_miss { HitKind::NearMissHomeRun } else { HitKind::HomeRun };
        let before = u32::try_from(bases.occupied_count()).unwrap();

        let hit = resolve_hit(&mut state, Side::Away, 0, kind, &defense(), &bases, outs);
        prop_assert_eq!(hit.runs, before + 1);
        prop_assert_eq!(hit.bases, Bases::empty());
        prop_assert_eq!(hit.outs, outs);
        prop_assert_eq!(state.score.away, before + 1);
    }

    /// Non-home-run hits never put one runner on two bases or lose anyone.
    #[test]
    fn prop_hit_conserves_runners(
        occupied in prop::array::uniform3(any::<bool>()),
        kind in prop::sample::select(vec![
            HitKind::Single,
            HitKind::Double,
            HitKind::Triple,
            HitKind::BuntHit,
        ]),
        runners in roster_strategy(),
        fielders in roster_strategy(),
        seed in any::<u64>(),
    ) {
        let mut state = GameState::new(
            team("Scorpions", &runners),
            team("Aether", &fielders),
            GameRng::seed_from_u64(seed),
        );
        let mut bases = Bases::empty();
        for (base, on) in Base::OCCUPIABLE.into_iter().zip(occupied) {
            if on {
                bases.set(base, Some(base.index() + 1));
            }
        }
        let before = u32::try_from(bases.occupied_count()).unwrap();

        let hit = resolve_hit(&mut state, Side::Away, 0, kind, &defense(), &bases, 0);
        let mut aboard: Vec<_> = hit.bases.runners().map(|(_, idx)| idx).collect();
        let count = u32::try_from(aboard.len()).unwrap();
        aboard.sort_unstable();
        aboard.dedup();
        prop_assert_eq!(u32::try_from(aboard.len()).unwrap(), count);
        // a third out strands the batter at the plate
        let expected = if hit.outs >= 3 { before } else { before + 1 };
        prop_assert_eq!(count + hit.runs + hit.outs, expected);
        prop_assert_eq!(state.score.away, hit.runs);
    }

    /// Every brawl costs somebody, and the loser never loses fewer than the winner.
    #[test]
    fn prop_brawl_casualties(away in 0i32..400, home in 0i32..400) {
        let [a, h] = casualty_counts(away, home);
        prop_assert!(a + h >= 1);
        if away > home {
            prop_assert!(h >= a);
        } else if home > away {
            prop_assert!(a >= h);
        }
    }
}
