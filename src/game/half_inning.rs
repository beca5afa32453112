//! One team's turn at bat.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::game::at_bat::{AtBatOutcome, HitKind, resolve_at_bat};
use crate::game::bases::Bases;
use crate::game::baserunning::resolve_hit;
use crate::game::brawl::{BrawlTrigger, maybe_trigger_brawl};
use crate::game::defense::Defense;
use crate::game::invariants::assert_invariants;
use crate::game::player::{Player, RosterIndex};
use crate::game::recovery::recovery_pass;
use crate::game::running_game::{attempt_pickoff, attempt_steals};
use crate::game::state::{GameState, Side, Team};

/// Plate appearances after which the umpire retires the side.
///
/// Lopsided matchups can make outs impossible, so this is what bounds a half.
pub const MERCY_PLATE_APPEARANCES: u32 = 50;

/// Where a half-inning sits in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfInningContext {
    /// Inning number, from 1.
    pub inning: u32,
    /// Length of regulation play.
    pub regulation: u32,
    /// Deficit that riles the batting team.
    pub riled_deficit: u32,
    /// Skip the riled-up check at the end of the half.
    pub suppress_riled: bool,
}

/// What happened in a half-inning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HalfInning {
    /// Play-by-play.
    pub lines: Vec<String>,
    /// Runs the batting team scored.
    pub runs: u32,
    /// Outs recorded; may exceed three.
    pub outs: u32,
    /// The batting team ran out of players.
    pub forfeit: bool,
    /// The side was retired by the mercy rule.
    pub mercy: bool,
}

/// Shuffled batting order that avoids sending the same player up twice in a row.
#[derive(Debug, Clone, Default)]
struct Lineup {
    remaining: Vec<RosterIndex>,
    last: Option<RosterIndex>,
}

impl Lineup {
    fn refill<R: Rng + ?Sized>(&mut self, players: &[Player], bases: &Bases, rng: &mut R) {
        let active = (0..players.len()).filter(|&idx| players[idx].is_active());
        let mut eligible: Vec<RosterIndex> = active
            .clone()
            .filter(|&idx| bases.position_of(idx).is_none())
            .collect();
        if eligible.len() > 1 {
            if let Some(last) = self.last {
                eligible.retain(|&idx| idx != last);
            }
        }
        if eligible.is_empty() {
            eligible = active.collect();
        }
        eligible.shuffle(rng);
        self.remaining = eligible;
    }

    fn next<R: Rng + ?Sized>(
        &mut self,
        players: &[Player],
        bases: &Bases,
        rng: &mut R,
    ) -> Option<RosterIndex> {
        if self.remaining.is_empty() {
            self.refill(players, bases, rng);
        }
        let last = self.last;
        let fresh: Vec<usize> = (0..self.remaining.len())
            .filter(|&i| Some(self.remaining[i]) != last)
            .collect();
        let off_base: Vec<usize> = fresh
            .iter()
            .copied()
            .filter(|&i| bases.position_of(self.remaining[i]).is_none())
            .collect();
        let pool = if !off_base.is_empty() {
            off_base
        } else if !fresh.is_empty() {
            fresh
        } else {
            (0..self.remaining.len()).collect()
        };
        let slot = *pool.choose(rng)?;
        let batter = self.remaining.swap_remove(slot);
        self.last = Some(batter);
        Some(batter)
    }
}

/// Line announcing a batter, or `None` for a dead player with no last at-bat left.
///
/// Calling up a dead player uses their final trip to the plate.
fn batter_status(player: &mut Player, team_name: &str) -> Option<String> {
    if player.is_dead {
        if !player.final_bat_allowed {
            return None;
        }
        player.final_bat_allowed = false;
        return Some(format!(
            "{} was called to the plate... but they're dead.",
            player.name
        ));
    }
    if player.is_knocked_out() {
        return Some(format!(
            "{} was called to the plate... but they're knocked out.",
            player.name
        ));
    }
    Some(format!(
        "{} steps up to the plate, batting for {team_name}.",
        player.display_name()
    ))
}

fn insult(outs: u32) -> Option<&'static str> {
    match outs {
        4 => Some("The offense is insulted by the defense's unnecessary 4th out! 🤡"),
        5 => Some(
            "The offense is greatly insulted by the defense's unnecessary 4th and 5th outs! 👺",
        ),
        6 => Some(
            "The offense is extremely insulted by the defense's unnecessary 4th, 5th, and 6th outs! 💩💩💩",
        ),
        _ => None,
    }
}

fn hit_trigger(kind: HitKind, runs: u32) -> Option<BrawlTrigger> {
    match kind {
        HitKind::Single => Some(BrawlTrigger::Single),
        HitKind::Double => Some(BrawlTrigger::Double),
        HitKind::Triple => Some(BrawlTrigger::Triple),
        HitKind::BuntHit => None,
        HitKind::HomeRun if runs == 4 => Some(BrawlTrigger::GrandSlam),
        HitKind::HomeRun => Some(BrawlTrigger::HomeRun),
        HitKind::NearMissHomeRun => Some(BrawlTrigger::NearMissHomeRun),
    }
}

fn drop_inactive_runners(state: &GameState, batting: Side, bases: &mut Bases) {
    let team = state.team(batting);
    bases.retain(|idx| team.players.get(idx).is_some_and(Player::is_active));
}

fn decrement_knockouts(team: &mut Team) {
    for player in &mut team.players {
        player.knockout_halves_remaining = player.knockout_halves_remaining.saturating_sub(1);
    }
}

/// Play `batting`'s half of an inning against `defense`.
#[instrument(skip(state, defense), fields(inning = ctx.inning))]
pub fn play_half_inning(
    state: &mut GameState,
    batting: Side,
    defense: &Defense,
    ctx: HalfInningContext,
) -> HalfInning {
    let mut half = HalfInning::default();
    let team_name = state.team(batting).name.clone();
    let runs_before = state.score.get(batting);

    for side in Side::BOTH {
        let (teams, rng) = (&mut state.teams, &mut state.rng);
        half.lines.extend(recovery_pass(&mut teams[side.index()], rng));
    }
    for team in &mut state.teams {
        decrement_knockouts(team);
    }

    if state.team(batting).players.is_empty() {
        half.lines.push(format!(
            "{team_name} has no players left and must forfeit immediately!"
        ));
        half.forfeit = true;
        return half;
    }

    let mut bases = Bases::empty();
    let mut lineup = Lineup::default();
    let pitcher_name = state.player(batting.opponent(), defense.pitcher).name.clone();
    let mut plate_appearances = 0;

    loop {
        if !state.team(batting).has_active() {
            half.lines.push(format!(
                "{team_name} has no active players left and must forfeit immediately!"
            ));
            half.forfeit = true;
            break;
        }
        let batter = {
            let (teams, rng) = (&state.teams, &mut state.rng);
            lineup.next(&teams[batting.index()].players, &bases, rng)
        };
        let Some(batter) = batter else {
            half.forfeit = true;
            break;
        };

        if let Some(base) = bases.position_of(batter) {
            bases.take(base);
            half.lines.push(format!(
                "{} leaves {base} to take a turn at the plate.",
                state.player(batting, batter).display_name()
            ));
        }

        let player = state.player_mut(batting, batter);
        if let Some(status) = batter_status(player, &team_name) {
            half.lines.push(status);
        }
        if player.pending_death {
            player.pending_death = false;
            player.is_dead = true;
        }
        if !player.is_active() {
            continue;
        }
        let batter_name = player.name.clone();

        let pickoff = attempt_pickoff(state, batting, defense, &mut bases, half.outs);
        half.lines.extend(pickoff.lines);
        half.outs = pickoff.outs;
        if half.outs >= 3 {
            half.lines.push(format!(
                "{batter_name} mopes out of the batter's box, disappointed. 😞"
            ));
            break;
        }

        let steals = attempt_steals(state, batting, defense, &mut bases, half.outs);
        half.lines.extend(steals.lines);
        half.outs = steals.outs;
        if half.outs >= 3 {
            let runner = steals
                .caught
                .map(|idx| state.player(batting, idx).display_name())
                .unwrap_or_default();
            half.lines.push(format!(
                "{batter_name} squints disapprovingly at {runner} and exits the batter's box, annoyed. 😒"
            ));
            break;
        }

        plate_appearances += 1;
        let at_bat = resolve_at_bat(state, batting, batter, defense, &mut bases, half.outs);
        half.lines.extend(at_bat.lines);
        half.outs = at_bat.outs;
        drop_inactive_runners(state, batting, &mut bases);

        let trigger = match at_bat.outcome {
            AtBatOutcome::Hit(kind) => {
                let hit = resolve_hit(state, batting, batter, kind, defense, &bases, half.outs);
                half.lines.extend(hit.lines);
                bases = hit.bases;
                half.outs = hit.outs;
                hit_trigger(kind, hit.runs)
            }
            AtBatOutcome::Walk | AtBatOutcome::BeanedWalk => {
                let beaned = at_bat.outcome == AtBatOutcome::BeanedWalk;
                take_base(
                    state,
                    batting,
                    batter,
                    &pitcher_name,
                    beaned,
                    &mut bases,
                    &mut half.lines,
                );
                beaned.then_some(BrawlTrigger::Beaned)
            }
            AtBatOutcome::Strikeout => Some(BrawlTrigger::Strikeout),
            AtBatOutcome::FlyOut => Some(BrawlTrigger::FlyOut),
            AtBatOutcome::GroundOut => Some(BrawlTrigger::GroundOut),
            AtBatOutcome::SacrificeBunt
            | AtBatOutcome::BuntDoublePlay
            | AtBatOutcome::FoulLimit
            | AtBatOutcome::Incinerated => None,
        };
        if let Some(trigger) = trigger {
            half.lines.extend(maybe_trigger_brawl(state, trigger));
        }

        drop_inactive_runners(state, batting, &mut bases);
        assert_invariants(state, batting, &bases);

        if half.outs >= 3 {
            half.lines.extend(insult(half.outs).map(str::to_string));
            break;
        }
        if plate_appearances >= MERCY_PLATE_APPEARANCES {
            half.lines.push(format!(
                "The umpire has seen enough. {team_name} is retired by the mercy rule after {plate_appearances} trips to the plate!"
            ));
            half.outs = 3;
            half.mercy = true;
            break;
        }
    }

    if !ctx.suppress_riled {
        let deficit = state.score.deficit(batting);
        let team = state.team_mut(batting);
        if let Some(message) =
            team.riled
                .trigger_by_deficit(deficit, ctx.riled_deficit, &team_name)
        {
            team.apply_riled_buff();
            half.lines.push(message);
        }
    }

    let mut end = format!(
        "END OF THE {} OF INNING {}.",
        if batting == Side::Away { "TOP" } else { "BOTTOM" },
        ctx.inning
    );
    if batting == Side::Home && ctx.inning >= ctx.regulation && state.score.home > state.score.away
    {
        end.push_str(" 🍌 SHAME! 🍌");
    }
    half.lines.push(String::new());
    half.lines.push(end);
    half.lines.push(state.score_line());
    half.lines.push(String::new());

    for team in &mut state.teams {
        team.finalize_pending_deaths();
    }

    half.runs = state.score.get(batting) - runs_before;
    debug!(
        runs = half.runs,
        outs = half.outs,
        forfeit = half.forfeit,
        mercy = half.mercy,
        "half-inning over"
    );
    half
}

/// Walk or hit-by-pitch: the batter takes first, forcing runners along.
fn take_base(
    state: &mut GameState,
    batting: Side,
    batter: RosterIndex,
    pitcher_name: &str,
    beaned: bool,
    bases: &mut Bases,
    lines: &mut Vec<String>,
) {
    let label = state.player(batting, batter).display_name();
    let forced = bases.force_batter(batter);
    if let Some(runner) = forced {
        lines.push(format!(
            "{label} takes a walk and advances to first. {} advances to home plate on the walk! {bases}",
            state.player(batting, runner).name
        ));
        lines.extend(state.credit_runs(batting, 1));
        lines.push(state.score_line());
    } else if beaned {
        lines.push(format!(
            "{label} is beaned by {pitcher_name}! Automatic walk! {} advances to first. The offense is brooding... {bases}",
            state.player(batting, batter).name
        ));
    } else {
        lines.push(format!("{label} takes a walk and advances to first. {bases}"));
    }
}
