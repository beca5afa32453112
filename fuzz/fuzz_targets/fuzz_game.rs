#![no_main]

//! Full game fuzzer.
//!
//! Plays a complete game between two arbitrary rosters, including short
//! rosters, dead starters and odd inning settings, then checks the report
//! agrees with itself.

use arbitrary::Arbitrary;
use basebrawl::{Game, GameConfig, GameOutcome, Player, Stats, Team};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated player.
#[derive(Arbitrary, Debug)]
struct FuzzPlayer {
    stats: [u8; 8],
    dead: bool,
    knocked_out: u8,
}

/// Structured input for full game fuzzing.
#[derive(Arbitrary, Debug)]
struct GameInput {
    away: Vec<FuzzPlayer>,
    home: Vec<FuzzPlayer>,
    seed: u64,
    innings: u8,
    extra: u8,
}

fn team(name: &str, players: &[FuzzPlayer]) -> Team {
    let players = players
        .iter()
        .take(12)
        .enumerate()
        .map(|(i, fuzz)| {
            // Cap stats to the roster loader's range
            let s = fuzz.stats.map(|v| i32::from(v % 101));
            let mut player = Player::new(
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
            );
            player.is_dead = fuzz.dead;
            player.knockout_halves_remaining = u32::from(fuzz.knocked_out % 6);
            player
        })
        .collect();
    Team::new(name, players)
}

fuzz_target!(|input: GameInput| {
    let innings = u32::from(input.innings % 9).max(1);
    let config = GameConfig {
        innings,
        max_innings: innings + u32::from(input.extra % 5),
        seed: Some(input.seed),
        ..GameConfig::default()
    };
    let away = team("Scorpions", &input.away);
    let home = team("Aether", &input.home);

    let Ok(game) = Game::new(config, away, home) else {
        return;
    };
    let report = game.play();

    assert!(report.innings <= config.max_innings);
    match report.outcome {
        GameOutcome::Winner { side } => assert_eq!(report.score.leader(), Some(side)),
        GameOutcome::Tie => assert_eq!(report.score.away, report.score.home),
        GameOutcome::Forfeit { .. } => {}
    }
});
