//! Runner advancement after a hit.
//!
//! Runners are resolved from third back to first so a lead runner's
//! result (a claimed base, or a base frozen by an out) constrains the
//! runners behind. The batter goes last under the same rules.

use tracing::trace;

use crate::game::at_bat::HitKind;
use crate::game::bases::{Base, Bases, format_bso};
use crate::game::brawl::{BrawlTrigger, Harm, apply_harm, maybe_trigger_brawl};
use crate::game::defense::{Defense, cover_base, fielder_score};
use crate::game::narrate::{hit_description, home_run_headline};
use crate::game::player::RosterIndex;
use crate::game::state::{GameState, Side};

/// Outcome of a runner's advancement roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    /// Beat the throw with room to spare.
    ExtraBase,
    /// Made it.
    Safe,
    /// Out by a hair.
    CloseTagOut,
    /// Ran into the fielder.
    Collision,
    /// Thrown out.
    TagOut,
}

/// Classify `d100 + baserunning - fielding`.
#[must_use]
pub const fn baserunning_result(total: i32) -> RunResult {
    match total {
        90.. => RunResult::ExtraBase,
        45..=89 => RunResult::Safe,
        44 => RunResult::CloseTagOut,
        43 => RunResult::Collision,
        _ => RunResult::TagOut,
    }
}

/// Everything a hit did to the bases, the score and the out count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitResolution {
    /// Occupancy after the play.
    pub bases: Bases,
    /// Runs that counted.
    pub runs: u32,
    /// Outs after the play.
    pub outs: u32,
    /// Names of everyone who scored, in order.
    pub scorers: Vec<String>,
    /// Per-runner narration folded into the hit description.
    pub runner_lines: Vec<String>,
    /// Base the batter reached; `None` for a home run or when the inning died first.
    pub batter_movement: Option<Base>,
    /// The hit as narrated, downgraded to match the batter's base.
    pub narrated: HitKind,
    /// Lines for the log: the description first, then score updates and brawls.
    pub lines: Vec<String>,
}

impl HitResolution {
    /// Four runs on one home run swing.
    #[must_use]
    pub fn is_grand_slam(&self) -> bool {
        self.narrated.is_home_run() && self.runs == 4
    }
}

/// Resolve a hit of `kind` by `batter` against the current `bases`.
pub fn resolve_hit(
    state: &mut GameState,
    batting: Side,
    batter: RosterIndex,
    kind: HitKind,
    defense: &Defense,
    bases: &Bases,
    outs: u32,
) -> HitResolution {
    if outs >= 3 {
        return HitResolution {
            bases: *bases,
            runs: 0,
            outs,
            scorers: Vec::new(),
            runner_lines: Vec::new(),
            batter_movement: None,
            narrated: kind,
            lines: Vec::new(),
        };
    }
    if kind.is_home_run() {
        return home_run(state, batting, batter, kind, bases, outs);
    }

    let mut play = HitPlay {
        state,
        batting,
        defense,
        frozen: [false; 4],
        next: Bases::empty(),
        outs,
        runner_lines: Vec::new(),
        lines: Vec::new(),
        runs: 0,
        scorers: Vec::new(),
    };
    for base in [Base::Third, Base::Second, Base::First] {
        if let Some(runner) = bases.get(base) {
            play.advance(runner, base, kind.runner_target(base));
        }
    }
    let reached = play.place_batter(batter, kind);
    let narrated = narrated_kind(kind, reached);

    let HitPlay {
        state,
        next,
        outs,
        runner_lines,
        mut lines,
        runs,
        scorers,
        ..
    } = play;

    let label = state.player(batting, batter).display_name();
    let mut description = hit_description(narrated, &label, &mut state.rng);
    if let Some(base) = reached {
        description.push_str(&format!(" reaching {base}."));
    }
    for line in &runner_lines {
        description.push(' ');
        description.push_str(line);
    }
    description.push_str(&format!(" {} {next}", format_bso(0, 0, outs)));
    lines.insert(0, description);

    HitResolution {
        bases: next,
        runs,
        outs,
        scorers,
        runner_lines,
        batter_movement: reached,
        narrated,
        lines,
    }
}

fn home_run(
    state: &mut GameState,
    batting: Side,
    batter: RosterIndex,
    kind: HitKind,
    bases: &Bases,
    outs: u32,
) -> HitResolution {
    let mut scorers: Vec<String> = bases
        .runners()
        .map(|(_, runner)| state.player(batting, runner).display_name())
        .collect();
    let label = state.player(batting, batter).display_name();
    scorers.push(label.clone());
    let runs = u32::try_from(scorers.len()).unwrap_or(4);

    let mut lines = vec![format!(
        "{} {} {}",
        home_run_headline(&label, kind == HitKind::NearMissHomeRun, &scorers),
        format_bso(0, 0, outs),
        Bases::empty()
    )];
    lines.extend(state.credit_runs(batting, runs));
    lines.push(state.score_line());

    HitResolution {
        bases: Bases::empty(),
        runs,
        outs,
        scorers,
        runner_lines: Vec::new(),
        batter_movement: None,
        narrated: kind,
        lines,
    }
}

/// The hit as it should be narrated once the batter's base is known.
fn narrated_kind(kind: HitKind, reached: Option<Base>) -> HitKind {
    match (kind, reached) {
        (HitKind::Double | HitKind::Triple, Some(Base::First)) => HitKind::Single,
        (HitKind::Triple, Some(Base::Second)) => HitKind::Double,
        _ => kind,
    }
}

struct HitPlay<'a> {
    state: &'a mut GameState,
    batting: Side,
    defense: &'a Defense,
    /// Bases where an out was recorded this play, home included.
    frozen: [bool; 4],
    next: Bases,
    outs: u32,
    runner_lines: Vec<String>,
    lines: Vec<String>,
    runs: u32,
    scorers: Vec<String>,
}

impl HitPlay<'_> {
    fn is_open(&self, base: Base) -> bool {
        !self.frozen[base.index()] && (base == Base::Home || !self.next.is_occupied(base))
    }

    /// Step `target` back toward `from` until it is open. Returns `from` if nothing ahead is.
    fn open_target(&self, from: Base, mut target: Base) -> Base {
        while target > from && !self.is_open(target) {
            match target.prev() {
                Some(prev) => target = prev,
                None => break,
            }
        }
        target
    }

    fn runner_label(&self, runner: RosterIndex) -> String {
        self.state.player(self.batting, runner).display_name()
    }

    fn bso(&self) -> String {
        format_bso(0, 0, self.outs)
    }

    /// Put `runner` on `base`, or score them from home while the inning lives.
    fn arrive(&mut self, runner: RosterIndex, base: Base) {
        if base != Base::Home {
            self.next.set(base, Some(runner));
            return;
        }
        if self.outs >= 3 {
            return;
        }
        self.runs += 1;
        let name = self.runner_label(runner);
        self.scorers.push(name);
        self.lines.extend(self.state.credit_runs(self.batting, 1));
        self.lines.push(self.state.score_line());
    }

    fn record_out(&mut self, base: Base) {
        self.outs += 1;
        self.frozen[base.index()] = true;
    }

    fn advance(&mut self, runner: RosterIndex, from: Base, wanted: Base) {
        if self.outs >= 3 {
            self.next.set(from, Some(runner));
            return;
        }
        let target = self.open_target(from, wanted);
        if target == from {
            trace!(runner, ?from, "runner holds");
            self.next.set(from, Some(runner));
            return;
        }

        let fielding = self.batting.opponent();
        let coverage = {
            let roster = &self.state.teams[fielding.index()].players;
            cover_base(self.defense, roster, target, &mut self.state.rng)
        };
        let roster = &self.state.teams[fielding.index()].players;
        let label = self.runner_label(runner);

        let Some(defender) = coverage.active_defender(roster) else {
            let mut line = if target == Base::Home {
                format!("{label} freely advances to home plate and scores")
            } else {
                format!("{label} freely advances to {target}")
            };
            if let Some(status) = &coverage.primary_status {
                line.push_str(&format!(" because {status}"));
            }
            line.push('!');
            self.runner_lines.push(line);
            self.arrive(runner, target);
            return;
        };

        let defender_label = roster[defender].display_name();
        let defense_score = fielder_score(roster, Some(defender));
        let assist = coverage
            .assist
            .map(|(position, idx)| (position, roster[idx].name.clone()));
        let primary_label = coverage.primary.map(|idx| roster[idx].display_name());
        if let Some(status) = coverage.primary_status.clone() {
            self.runner_lines.push(status);
        }

        let speed = self.state.player(self.batting, runner).stats().baserunning;
        let total = self.state.d100() + speed - defense_score;
        let result = baserunning_result(total);
        trace!(runner, ?from, ?target, total, ?result, "advancement roll");

        match result {
            RunResult::ExtraBase => {
                if target == Base::Home {
                    self.runner_lines.push(format!("{label} scores!"));
                    self.arrive(runner, target);
                    return;
                }
                let extra = target.next();
                if !self.is_open(extra) {
                    self.arrive(runner, target);
                } else if extra == Base::Home {
                    self.runner_lines
                        .push(format!("{label} takes an extra base and scores!"));
                    self.arrive(runner, extra);
                } else {
                    self.runner_lines.push(format!(
                        "{label} takes an extra base and ends up on {extra}!"
                    ));
                    self.arrive(runner, extra);
                }
            }
            RunResult::Safe => {
                if target == Base::Home {
                    self.runner_lines.push(format!("{label} scores!"));
                }
                self.arrive(runner, target);
            }
            RunResult::Collision => {
                if self.state.chance(0.5) {
                    self.runner_lines.push(format!(
                        "{label} collides with {defender_label} but reaches {target} safely!"
                    ));
                    self.arrive(runner, target);
                    return;
                }
                self.record_out(target);
                self.runner_lines.push(format!(
                    "{label} collides with {defender_label} and is tagged out at {target}!"
                ));
                self.collision_injury(runner, defender, target);
            }
            RunResult::CloseTagOut => {
                self.record_out(target);
                self.runner_lines.push(format!(
                    "It's a close call, but {label} is tagged out at {target}! The offense is brooding... {}",
                    self.bso()
                ));
                let brawl = maybe_trigger_brawl(self.state, BrawlTrigger::CloseTagOut);
                self.lines.extend(brawl);
            }
            RunResult::TagOut => {
                self.record_out(target);
                let line = match (assist, primary_label) {
                    (Some((position, thrower)), Some(receiver)) => {
                        let title = position.title();
                        let mut chars = title.chars();
                        let title = chars.next().map_or_else(String::new, |first| {
                            first.to_uppercase().collect::<String>() + chars.as_str()
                        });
                        format!(
                            "{title} {thrower} fires a quick pass to {receiver} at {target}. {label} is out! Great assist by {thrower}!"
                        )
                    }
                    _ => format!("{label} is tagged out at {target}!"),
                };
                self.runner_lines.push(line);
            }
        }
    }

    /// A collision out can knock someone cold; a hurt defender may start a fight.
    fn collision_injury(&mut self, runner: RosterIndex, defender: RosterIndex, base: Base) {
        let chance = match base {
            Base::Third => 0.6,
            Base::Home => 0.8,
            Base::First | Base::Second => 0.4,
        };
        if !self.state.chance(chance) {
            return;
        }
        let fielding = self.batting.opponent();
        let defender_hurt = self.state.chance(0.75);
        let (side, idx) = if defender_hurt {
            (fielding, defender)
        } else {
            (self.batting, runner)
        };
        let player = self.state.player_mut(side, idx);
        apply_harm(player, Harm::KnockedOut);
        let name = player.name.clone();
        self.runner_lines
            .push(format!("{name} is knocked out from the collision!"));
        if defender_hurt {
            self.runner_lines.push("The defense is angry...".to_string());
            let brawl = maybe_trigger_brawl(self.state, BrawlTrigger::Collision);
            self.lines.extend(brawl);
        }
    }

    /// Place the batter, stepping back past frozen or claimed bases. A
    /// claimed first base forces the runners ahead.
    fn place_batter(&mut self, batter: RosterIndex, kind: HitKind) -> Option<Base> {
        if self.outs >= 3 {
            return None;
        }
        let mut target = kind.batter_target();
        while target > Base::First && !self.is_open(target) {
            match target.prev() {
                Some(prev) => target = prev,
                None => break,
            }
        }
        if target == Base::First && self.next.is_occupied(Base::First) {
            if let Some(forced) = self.next.force_batter(batter) {
                let label = self.runner_label(forced);
                self.runner_lines
                    .push(format!("{label} is forced home and scores!"));
                self.arrive(forced, Base::Home);
            }
        } else {
            self.next.set(target, Some(batter));
        }
        Some(target)
    }
}
