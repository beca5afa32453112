//! The pitch-by-pitch at-bat engine.
//!
//! An at-bat ends only through a terminal branch: a ball in play, a walk,
//! a strikeout, a bunt, or one of the rare lethal outcomes. Hits in the
//! park are handed back unresolved so the half-inning can run the bases.

use serde::Serialize;
use tracing::trace;

use crate::game::bases::{Base, Bases, format_bso};
use crate::game::brawl::{BrawlTrigger, maybe_trigger_brawl};
use crate::game::defense::{Defense, Position};
use crate::game::narrate::{FLY_OUTS, GROUND_OUTS, pick};
use crate::game::player::{RosterIndex, Stats};
use crate::game::state::{GameState, Side};

/// Fouls in one at-bat before the gods lose patience.
pub const FOUL_LIMIT: u32 = 6;

/// Kinds of hit the baserunning resolver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HitKind {
    /// Batter aims for first.
    Single,
    /// Batter aims for second.
    Double,
    /// Batter aims for third.
    Triple,
    /// Bunt that drops in; runs like a single.
    BuntHit,
    /// Over the fence.
    HomeRun,
    /// Barely over the fence.
    NearMissHomeRun,
}

impl HitKind {
    /// Whether the ball left the park.
    #[must_use]
    pub const fn is_home_run(self) -> bool {
        matches!(self, Self::HomeRun | Self::NearMissHomeRun)
    }

    /// Base the batter tries for.
    #[must_use]
    pub const fn batter_target(self) -> Base {
        match self {
            Self::Single | Self::BuntHit => Base::First,
            Self::Double => Base::Second,
            Self::Triple => Base::Third,
            Self::HomeRun | Self::NearMissHomeRun => Base::Home,
        }
    }

    /// Base a runner standing on `from` tries for.
    #[must_use]
    pub const fn runner_target(self, from: Base) -> Base {
        match (self, from) {
            (Self::Single | Self::BuntHit, _) | (Self::Double, Base::First) => from.next(),
            _ => Base::Home,
        }
    }
}

/// How an at-bat ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AtBatOutcome {
    /// Ball in play or out of the park; bases still to be run.
    Hit(HitKind),
    /// Four balls.
    Walk,
    /// Hit by a pitch; takes first.
    BeanedWalk,
    /// Three strikes.
    Strikeout,
    /// Caught in the air.
    FlyOut,
    /// Thrown out on the ground, possibly with runners caught in rundowns.
    GroundOut,
    /// Batter out, runner from third scores.
    SacrificeBunt,
    /// Batter and lead runner both out.
    BuntDoublePlay,
    /// Sixth foul; the batter is struck down.
    FoulLimit,
    /// Beaned by a pitch with heat on it.
    Incinerated,
}

/// Result of one plate appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtBat {
    /// How it ended.
    pub outcome: AtBatOutcome,
    /// Play-by-play for the at-bat.
    pub lines: Vec<String>,
    /// Outs after the at-bat.
    pub outs: u32,
    /// Final ball count.
    pub balls: u32,
    /// Final strike count.
    pub strikes: u32,
}

/// Classification of a contact roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// In play, aiming for a triple.
    Triple,
    /// In play, aiming for a double.
    Double,
    /// In play, aiming for a single.
    Single,
    /// Foul ball.
    Foul,
    /// Fly out.
    FlyOut,
    /// Ground out.
    GroundOut,
}

/// Classify a contact roll given the batter's agility bonus.
#[must_use]
pub const fn classify_contact(roll: i32, agility_bonus: i32) -> Contact {
    if roll >= 99 - agility_bonus {
        Contact::Triple
    } else if roll >= 89 - agility_bonus {
        Contact::Double
    } else if roll >= 55 - agility_bonus {
        Contact::Single
    } else if roll >= 35 {
        Contact::Foul
    } else if roll >= 16 {
        Contact::FlyOut
    } else {
        Contact::GroundOut
    }
}

/// Ball threshold for a pitch not put in play; nervier batters draw more balls.
#[must_use]
pub fn ball_threshold(chutzpah: i32) -> i32 {
    (33 - chutzpah).max(23)
}

struct Plate<'a> {
    state: &'a mut GameState,
    batting: Side,
    batter: RosterIndex,
    defense: &'a Defense,
    bases: &'a mut Bases,
    outs: u32,
    balls: u32,
    strikes: u32,
    lines: Vec<String>,
}

/// Play out an at-bat from the first pitch.
///
/// `bases` is updated for plays resolved here (bunts and rundowns); hits
/// are returned as [`AtBatOutcome::Hit`] for the baserunning resolver.
pub fn resolve_at_bat(
    state: &mut GameState,
    batting: Side,
    batter: RosterIndex,
    defense: &Defense,
    bases: &mut Bases,
    outs: u32,
) -> AtBat {
    state.foul_mood.reset_per_at_bat();
    let mut plate = Plate {
        state,
        batting,
        batter,
        defense,
        bases,
        outs,
        balls: 0,
        strikes: 0,
        lines: Vec::new(),
    };
    let outcome = match plate.try_bunt() {
        Some(outcome) => outcome,
        None => plate.pitch_sequence(),
    };
    AtBat {
        outcome,
        lines: plate.lines,
        outs: plate.outs,
        balls: plate.balls,
        strikes: plate.strikes,
    }
}

impl Plate<'_> {
    fn fielding(&self) -> Side {
        self.batting.opponent()
    }

    fn batter_stats(&self) -> Stats {
        self.state.player(self.batting, self.batter).stats()
    }

    fn batter_label(&self) -> String {
        self.state.player(self.batting, self.batter).display_name()
    }

    fn batter_name(&self) -> String {
        self.state.player(self.batting, self.batter).name.clone()
    }

    fn bso(&self) -> String {
        format_bso(self.balls, self.strikes, self.outs)
    }

    /// Bunt attempt before the first pitch, with a runner on third and fewer than two out.
    fn try_bunt(&mut self) -> Option<AtBatOutcome> {
        let runner = self.bases.get(Base::Third)?;
        let bat = self.batter_stats();
        if bat.power > bat.chutzpah || self.outs >= 2 {
            return None;
        }
        let runner_speed = self.state.player(self.batting, runner).stats().baserunning;
        let attempt = 0.05 + 0.05 * f64::from(bat.chutzpah) + 0.02 * f64::from(runner_speed);
        if !self.state.chance(attempt) {
            return None;
        }

        let roll = self.state.d100() + bat.batting + bat.chutzpah;
        trace!(roll, "bunt");
        if roll >= 86 {
            return Some(AtBatOutcome::Hit(HitKind::BuntHit));
        }

        self.bases.take(Base::Third);
        let runner_name = self.state.player(self.batting, runner).name.clone();
        if roll >= 16 {
            let first = self.bases.take(Base::First);
            let second = self.bases.take(Base::Second);
            self.bases.set(Base::Second, first);
            self.bases.set(Base::Third, second);
            self.outs += 1;
            self.lines.push(format!(
                "{} makes a sacrifice bunt play! {} is out, but {runner_name} scores! {} {}",
                self.batter_label(),
                self.batter_name(),
                self.bases,
                self.bso()
            ));
            self.lines.extend(self.state.credit_runs(self.batting, 1));
            self.lines.push(self.state.score_line());
            return Some(AtBatOutcome::SacrificeBunt);
        }

        self.outs += 2;
        self.lines.push(format!(
            "{} attempts a bunt but it goes awry! Double play: both {} and {runner_name} are out. {} {}",
            self.batter_label(),
            self.batter_name(),
            self.bases,
            self.bso()
        ));
        Some(AtBatOutcome::BuntDoublePlay)
    }

    fn pitch_sequence(&mut self) -> AtBatOutcome {
        let pitcher = self.defense.pitcher;
        let fielding = self.fielding();
        let arm = self.state.player(fielding, pitcher).stats();
        let pitcher_name = self.state.player(fielding, pitcher).name.clone();
        let heat_line = format!(
            "🥵 {} puts on the heat! 🥵",
            self.state.player(fielding, pitcher).display_name()
        );
        let mut fouls = 0;

        loop {
            let bat = self.batter_stats();
            let raw = self.state.d100();
            let mut roll = raw + bat.batting - arm.pitching;
            let heat = self.state.d100() <= arm.power;
            if heat {
                roll -= 5;
            }
            trace!(raw, roll, heat, balls = self.balls, strikes = self.strikes, "pitch");

            if raw == 75 && self.state.chance(0.25) {
                if !heat {
                    return AtBatOutcome::BeanedWalk;
                }
                let label = self.batter_label();
                self.lines.push(heat_line);
                self.lines.push(format!(
                    "🔥 {label} is beaned by {pitcher_name}'s scorching fastball! {label} is INCINERATED! 🔥"
                ));
                self.state.player_mut(self.batting, self.batter).pending_death = true;
                let brawl = maybe_trigger_brawl(self.state, BrawlTrigger::Incinerated);
                self.lines.extend(brawl);
                return AtBatOutcome::Incinerated;
            }

            if raw == 100 && self.state.chance(0.5) {
                return AtBatOutcome::Hit(HitKind::NearMissHomeRun);
            }
            if roll >= 101 {
                return AtBatOutcome::Hit(HitKind::HomeRun);
            }
            if (roll == 100 && bat.power >= 1) || (roll == 99 && bat.power >= 6) {
                let second = if bat.power < 6 {
                    self.state.roll_range(1, 5)
                } else {
                    self.state.roll_range(6, 10)
                };
                if second <= bat.power {
                    return AtBatOutcome::Hit(HitKind::HomeRun);
                }
            }

            if roll >= 60 {
                let contact = self.state.d100() + bat.batting - arm.chutzpah;
                let base_bonus = bat.agility / 2;
                let on_edge = [99, 89, 55].iter().any(|t| contact == t - base_bonus);
                let bonus = if bat.agility % 2 == 1 && on_edge && self.state.chance(0.5) {
                    base_bonus + 1
                } else {
                    base_bonus
                };
                match classify_contact(contact, bonus) {
                    Contact::Triple => return AtBatOutcome::Hit(HitKind::Triple),
                    Contact::Double => return AtBatOutcome::Hit(HitKind::Double),
                    Contact::Single => return AtBatOutcome::Hit(HitKind::Single),
                    Contact::Foul => {
                        fouls += 1;
                        if fouls >= FOUL_LIMIT {
                            return self.smite();
                        }
                        if self.strikes < 2 {
                            self.strikes += 1;
                        }
                        self.lines
                            .push(format!("{} - Foul Ball! {}", self.batter_label(), self.bso()));
                        if self.state.foul_mood.update(true) {
                            self.lines.push(format!(
                                "The players are getting tired of this... {}",
                                self.state.foul_mood.message()
                            ));
                        }
                        continue;
                    }
                    Contact::FlyOut => {
                        self.outs += 1;
                        let flavor = pick(&FLY_OUTS, &mut self.state.rng);
                        self.lines
                            .push(format!("{} {flavor} {}", self.batter_label(), self.bso()));
                        return AtBatOutcome::FlyOut;
                    }
                    Contact::GroundOut => {
                        self.ground_out();
                        return AtBatOutcome::GroundOut;
                    }
                }
            }

            if roll >= ball_threshold(bat.chutzpah) {
                self.balls += 1;
                self.lines.push(format!(
                    "{} - Ball {}! {}",
                    self.batter_label(),
                    self.balls,
                    self.bso()
                ));
                if self.balls == 4 {
                    return AtBatOutcome::Walk;
                }
                continue;
            }

            let kind = if self.state.chance(0.67) {
                "looking"
            } else {
                "swinging"
            };
            if heat {
                self.lines.push(heat_line.clone());
            }
            self.strikes += 1;
            if self.strikes >= 3 {
                self.outs += 1;
                self.lines.push(format!(
                    "{} - Strike 3! {} strikes out, {kind}. {}",
                    self.batter_label(),
                    self.batter_name(),
                    self.bso()
                ));
                return AtBatOutcome::Strikeout;
            }
            self.lines.push(format!(
                "{} - Strike {}! {}",
                self.batter_label(),
                self.strikes,
                self.bso()
            ));
        }
    }

    fn smite(&mut self) -> AtBatOutcome {
        let label = self.batter_label();
        self.lines.push(format!("{label} - Foul Ball! {}", self.bso()));
        self.lines.push(format!(
            "⚡ THE GODS ARE FED UP WITH {label}'s FOULS! {label} is SMITED! ⚡"
        ));
        self.state.player_mut(self.batting, self.batter).pending_death = true;
        AtBatOutcome::FoulLimit
    }

    /// Batter out; each runner may also be run down, keyed to the shortstop.
    fn ground_out(&mut self) {
        self.outs += 1;
        let fielding = self.fielding();
        let shortstop = self
            .defense
            .at(Position::Shortstop)
            .filter(|&idx| self.state.player(fielding, idx).is_active());
        let (rundown_chance, shortstop_name) = match shortstop {
            Some(idx) => {
                let player = self.state.player(fielding, idx);
                (
                    0.20 + 0.02 * f64::from(player.stats().fielding),
                    player.name.clone(),
                )
            }
            None => (0.20, "the shortstop".to_string()),
        };

        let mut line = format!("{} - Ground Out! {}", self.batter_label(), self.bso());
        let mut tagged = false;
        let runners: Vec<(Base, RosterIndex)> = self.bases.runners().collect();
        for (base, runner) in runners {
            if !self.state.chance(rundown_chance) {
                continue;
            }
            self.outs += 1;
            self.bases.take(base);
            let label = self.state.player(self.batting, runner).display_name();
            if tagged {
                line.push_str(&format!(" {label} is tagged out at {base}! {}", self.bso()));
            } else {
                line.push_str(&format!(
                    " {label} is caught in a rundown and tagged out by {shortstop_name} at {base}! {}",
                    self.bso()
                ));
            }
            tagged = true;
        }
        if !tagged {
            let flavor = pick(&GROUND_OUTS, &mut self.state.rng);
            line = format!("{} {flavor} {}", self.batter_label(), self.bso());
        }
        self.lines.push(line);
    }
}
