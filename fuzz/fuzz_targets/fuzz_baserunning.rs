#![no_main]

//! Baserunning fuzzer.
//!
//! Resolves one hit from an arbitrary base state, out count and pair of
//! rosters, then checks that nobody is duplicated or lost.

use arbitrary::Arbitrary;
use basebrawl::game::{
    Base, Bases, Defense, GameRng, GameState, HitKind, check_invariants, resolve_hit,
};
use basebrawl::{Player, Side, Stats, Team};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;

/// Structured input for baserunning fuzzing.
#[derive(Arbitrary, Debug)]
struct HitInput {
    runner_stats: [[u8; 8]; 9],
    fielder_stats: [[u8; 8]; 9],
    occupied: [bool; 3],
    missing_fielders: [bool; 8],
    kind: u8,
    outs: u8,
    seed: u64,
}

fn team(name: &str, stats: &[[u8; 8]; 9]) -> Team {
    let players = stats
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let s = raw.map(|v| i32::from(v % 101));
            Player::new(
                format!("{name} {i}"),
                Stats {
                    power: s[0],
                    agility: s[1],
                    chutzpah: s[2],
                    batting: s[3],
                    pitching: s[4],
                    baserunning: s[5],
                    fielding: s[6],
                    brawling: s[7],
                },
            )
        })
        .collect();
    Team::new(name, players)
}

fuzz_target!(|input: HitInput| {
    let kind = match input.kind % 6 {
        0 => HitKind::Single,
        1 => HitKind::Double,
        2 => HitKind::Triple,
        3 => HitKind::BuntHit,
        4 => HitKind::HomeRun,
        _ => HitKind::NearMissHomeRun,
    };
    let outs = u32::from(input.outs % 3);

    let mut slots = [None; 8];
    for (i, slot) in slots.iter_mut().enumerate() {
        if !input.missing_fielders[i] {
            *slot = Some(i + 1);
        }
    }
    let defense = Defense::from_slots(0, slots);

    let mut state = GameState::new(
        team("Scorpions", &input.runner_stats),
        team("Aether", &input.fielder_stats),
        GameRng::seed_from_u64(input.seed),
    );
    let mut bases = Bases::empty();
    for (base, on) in Base::OCCUPIABLE.into_iter().zip(input.occupied) {
        if on {
            bases.set(base, Some(base.index() + 1));
        }
    }
    let before = u32::try_from(bases.occupied_count()).unwrap_or(0);

    let hit = resolve_hit(&mut state, Side::Away, 0, kind, &defense, &bases, outs);

    assert_eq!(state.score.away, hit.runs);
    if kind.is_home_run() {
        assert_eq!(hit.runs, before + 1);
        assert_eq!(hit.bases, Bases::empty());
    }
    let aboard = u32::try_from(hit.bases.occupied_count()).unwrap_or(0);
    let expected = if hit.outs >= 3 { before } else { before + 1 };
    assert_eq!(aboard + hit.runs + hit.outs - outs, expected);
    for violation in check_invariants(&state, Side::Away, &hit.bases) {
        // runners knocked cold mid-play stay on base until the next plate appearance
        assert!(violation.message.contains("while inactive"), "{violation}");
    }
});
