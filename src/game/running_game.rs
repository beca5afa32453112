//! Pickoffs and delayed steals, run between pitches before the at-bat proper.

use tracing::trace;

use crate::game::bases::{Base, Bases, format_bso};
use crate::game::defense::{Defense, Position, fielder_score};
use crate::game::player::RosterIndex;
use crate::game::state::{GameState, Side};

/// Result of one pickoff throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickoff {
    /// Runner caught leaning.
    PickedOff,
    /// Runner got back in time.
    Checked,
    /// Lazy throw, nothing happens.
    Failed,
    /// Pitcher slipped; everyone moves up.
    Balk,
}

/// Classify `d100 + max(pitching, agility) - baserunning`.
#[must_use]
pub const fn pickoff_result(roll: i32) -> Pickoff {
    match roll {
        80.. => Pickoff::PickedOff,
        30..=79 => Pickoff::Checked,
        10..=29 => Pickoff::Failed,
        _ => Pickoff::Balk,
    }
}

/// Steal attempt probability from `base`, by runner chutzpah.
#[must_use]
pub fn steal_chance(chutzpah: i32, base: Base) -> f64 {
    let multiplier = match base {
        Base::First => 1.0,
        Base::Second => 0.6,
        Base::Third | Base::Home => 0.2,
    };
    (f64::from(chutzpah) / 5.0 * 0.275 * multiplier).max(0.01)
}

/// What the running game did before the pitch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunningPlay {
    /// Narration.
    pub lines: Vec<String>,
    /// Outs after the play.
    pub outs: u32,
    /// Last runner thrown out, for the batter's parting glare.
    pub caught: Option<RosterIndex>,
}

fn score_from_base(state: &mut GameState, batting: Side, lines: &mut Vec<String>) {
    lines.extend(state.credit_runs(batting, 1));
    lines.push(state.score_line());
}

/// One pickoff throw at the first occupied base with an active runner.
pub fn attempt_pickoff(
    state: &mut GameState,
    batting: Side,
    defense: &Defense,
    bases: &mut Bases,
    outs: u32,
) -> RunningPlay {
    let mut play = RunningPlay {
        outs,
        ..RunningPlay::default()
    };
    let Some((base, runner)) = bases
        .runners()
        .find(|&(_, idx)| state.player(batting, idx).is_active())
    else {
        return play;
    };

    let fielding = batting.opponent();
    let arm = state.player(fielding, defense.pitcher).stats();
    let pitcher_name = state.player(fielding, defense.pitcher).name.clone();
    if !state.chance((f64::from(arm.agility) / 25.0).max(0.02)) {
        return play;
    }
    let label = state.player(batting, runner).display_name();
    let speed = state.player(batting, runner).stats().baserunning;
    let roll = state.d100() + arm.pitching.max(arm.agility) - speed;
    let result = pickoff_result(roll);
    trace!(runner, ?base, roll, ?result, "pickoff");

    match result {
        Pickoff::PickedOff => {
            bases.take(base);
            play.outs += 1;
            play.lines.push(format!(
                "⚾ Pitcher {pitcher_name} spins around and throws to {base}... OUT! {label} is picked off! {}",
                format_bso(0, 0, play.outs)
            ));
            play.caught = Some(runner);
        }
        Pickoff::Checked => play.lines.push(format!(
            "⚾ Pitcher {pitcher_name} throws to {base} for a pickoff! {label} runs back just in time. Safe!"
        )),
        Pickoff::Failed => {}
        Pickoff::Balk => {
            let scored = bases.advance_all();
            let mut line = format!(
                "Pitcher {pitcher_name} slips up on the mound... and it's a balk! All baserunners advance."
            );
            if let Some(idx) = scored {
                line.push_str(&format!(" {} scores!", state.player(batting, idx).name));
            }
            line.push_str(&format!(" {bases}"));
            play.lines.push(line);
            if scored.is_some() {
                score_from_base(state, batting, &mut play.lines);
            }
        }
    }
    play
}

/// Delayed steals, lead runner first. A runner only goes when the base ahead is empty.
pub fn attempt_steals(
    state: &mut GameState,
    batting: Side,
    defense: &Defense,
    bases: &mut Bases,
    outs: u32,
) -> RunningPlay {
    let mut play = RunningPlay {
        outs,
        ..RunningPlay::default()
    };
    let fielding = batting.opponent();
    let Some(catcher) = defense.at(Position::Catcher) else {
        return play;
    };
    let catcher_score = fielder_score(&state.team(fielding).players, Some(catcher));

    for base in [Base::Third, Base::Second, Base::First] {
        let Some(runner) = bases.get(base) else {
            continue;
        };
        let next = base.next();
        if !state.player(batting, runner).is_active() || bases.is_occupied(next) {
            continue;
        }
        let stats = state.player(batting, runner).stats();
        if !state.chance(steal_chance(stats.chutzpah, base)) {
            continue;
        }
        let roll = state.d100() + stats.baserunning.max(stats.chutzpah) - catcher_score;
        trace!(runner, ?base, roll, "steal");
        let label = state.player(batting, runner).display_name();
        bases.take(base);

        if roll >= 40 {
            if next == Base::Home {
                play.lines
                    .push(format!("{label} steals home base and scores! {bases}"));
                score_from_base(state, batting, &mut play.lines);
            } else {
                bases.set(next, Some(runner));
                play.lines.push(format!(
                    "{label} attempts to steal {next} and is safe! {bases}"
                ));
            }
            continue;
        }

        play.outs += 1;
        play.caught = Some(runner);
        play.lines.push(format!(
            "{label} attempts to steal {next} and is caught backtracking! Out! {} {bases}",
            format_bso(0, 0, play.outs)
        ));
        if play.outs >= 3 {
            break;
        }
    }
    play
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::{Player, Stats};
    use crate::game::state::Team;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team(name: &str, stats: Stats) -> Team {
        let players = (0..9)
            .map(|i| Player::new(format!("{name} {i}"), stats))
            .collect();
        Team::new(name, players)
    }

    fn defense() -> Defense {
        Defense::from_slots(
            0,
            [Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7), Some(8)],
        )
    }

    #[test]
    fn test_pickoff_thresholds() {
        assert_eq!(pickoff_result(80), Pickoff::PickedOff);
        assert_eq!(pickoff_result(79), Pickoff::Checked);
        assert_eq!(pickoff_result(30), Pickoff::Checked);
        assert_eq!(pickoff_result(29), Pickoff::Failed);
        assert_eq!(pickoff_result(10), Pickoff::Failed);
        assert_eq!(pickoff_result(9), Pickoff::Balk);
    }

    #[test]
    fn test_steal_chance() {
        assert!((steal_chance(0, Base::First) - 0.01).abs() < 1e-9);
        assert!((steal_chance(10, Base::First) - 0.55).abs() < 1e-9);
        assert!((steal_chance(10, Base::Second) - 0.33).abs() < 1e-9);
        assert!((steal_chance(10, Base::Third) - 0.11).abs() < 1e-9);
    }

    #[test]
    fn test_empty_bases_do_nothing() {
        let mut game = GameState::new(
            team("Scorpions", Stats::default().map(|_| 10)),
            team("Aether", Stats::default().map(|_| 10)),
            ChaCha8Rng::seed_from_u64(0),
        );
        let mut bases = Bases::empty();
        let pickoff = attempt_pickoff(&mut game, Side::Away, &defense(), &mut bases, 1);
        assert_eq!(pickoff, RunningPlay { outs: 1, ..RunningPlay::default() });
        let steals = attempt_steals(&mut game, Side::Away, &defense(), &mut bases, 1);
        assert!(steals.lines.is_empty());
    }

    #[test]
    fn test_blocked_runner_never_steals() {
        for seed in 0..50 {
            let mut game = GameState::new(
                team("Scorpions", Stats::default().map(|_| 10)),
                team("Aether", Stats::default()),
                ChaCha8Rng::seed_from_u64(seed),
            );
            let mut bases = Bases::empty();
            bases.set(Base::First, Some(1));
            bases.set(Base::Second, Some(2));
            let play = attempt_steals(&mut game, Side::Away, &defense(), &mut bases, 0);
            // second goes first; first can only follow into the space it leaves
            if bases.get(Base::Second) == Some(2) {
                assert_eq!(bases.get(Base::First), Some(1));
            }
            assert!(play.outs <= 2);
            assert_eq!(game.score.away, 0);
        }
    }

    #[test]
    fn test_steals_score_and_count_outs() {
        let mut stolen_home = false;
        for seed in 0..200 {
            let mut runner = Stats::default().map(|_| 10);
            runner.baserunning = 40;
            let mut game = GameState::new(
                team("Scorpions", runner),
                team("Aether", Stats::default()),
                ChaCha8Rng::seed_from_u64(seed),
            );
            let mut bases = Bases::empty();
            bases.set(Base::Third, Some(4));
            let play = attempt_steals(&mut game, Side::Away, &defense(), &mut bases, 0);
            if game.score.away == 1 {
                stolen_home = true;
                assert!(play.lines[0].starts_with("Scorpions 4 steals home base and scores!"));
                assert_eq!(bases, Bases::empty());
            }
            assert_eq!(play.outs, 0);
        }
        assert!(stolen_home);
    }

    #[test]
    fn test_balk_scores_runner_from_third() {
        let mut slow_arm = Stats::default();
        slow_arm.agility = 25;
        let mut fast = Stats::default();
        fast.baserunning = 200;
        let mut game = GameState::new(
            team("Scorpions", fast),
            team("Aether", slow_arm),
            ChaCha8Rng::seed_from_u64(7),
        );
        let mut bases = Bases::empty();
        bases.set(Base::First, Some(1));
        bases.set(Base::Third, Some(3));
        let play = attempt_pickoff(&mut game, Side::Away, &defense(), &mut bases, 0);
        assert_eq!(game.score.away, 1);
        assert_eq!(bases.get(Base::Second), Some(1));
        assert_eq!(bases.get(Base::Third), None);
        assert!(play.lines[0].contains("it's a balk!"));
        assert!(play.lines[0].contains("Scorpions 3 scores!"));
        assert_eq!(play.outs, 0);
    }
}
