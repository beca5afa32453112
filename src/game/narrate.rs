//! Play-by-play phrasing.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::at_bat::HitKind;

const SINGLES: [&str; 10] = [
    "punches a single through the infield,",
    "rolls a single past the diving infielder,",
    "slaps a sharp single into shallow center,",
    "muscles a single into right field,",
    "bloops a single just over the shortstop,",
    "drops a single into no-man's land,",
    "rips a single up the middle,",
    "pokes a single the other way,",
    "smacks a hard single into left field,",
    "bounces a single through the infield,",
];

const DOUBLES: [&str; 5] = [
    "sends it flying down the line for a double,",
    "smacks a double into the gap,",
    "hits a ground-rule double,",
    "rips a double off the outfield wall,",
    "drives a double,",
];

const TRIPLES: [&str; 5] = [
    "laces a triple into the corner,",
    "crushes a triple deep into the outfield,",
    "legs out a triple,",
    "finds the gap for a triple,",
    "smokes a triple,",
];

const BUNTS: [&str; 3] = [
    "tips a surprise bunt, sending the ball deep into the gap,",
    "executes a surprise bunt with finesse,",
    "surprisingly bunts the ball infield, hoping for advancement,",
];

pub(crate) const FLY_OUTS: [&str; 3] = [
    "sends the ball a bit too high... Flyout!",
    "pops it up and the ball is caught infield. Popout!",
    "lines it sharply for a Line Out!",
];

pub(crate) const GROUND_OUTS: [&str; 3] = [
    "chops it to the infield. Ground Out!",
    "bounces it straight to the shortstop. Ground Out!",
    "grounds one weakly. An easy out for the defense!",
];

/// Pick a line from `options`.
pub(crate) fn pick<R: Rng + ?Sized>(options: &[&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Opening clause for an in-park hit, e.g. `Vera Knox legs out a triple,`.
pub fn hit_description<R: Rng + ?Sized>(kind: HitKind, batter: &str, rng: &mut R) -> String {
    let options: &[&'static str] = match kind {
        HitKind::Double => &DOUBLES,
        HitKind::Triple => &TRIPLES,
        HitKind::BuntHit => &BUNTS,
        HitKind::Single | HitKind::HomeRun | HitKind::NearMissHomeRun => &SINGLES,
    };
    format!("{batter} {}", pick(options, rng))
}

/// `A`, `A and B`, `A, B, and C`.
#[must_use]
pub fn format_scorers(scorers: &[String]) -> String {
    match scorers {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

/// `A is`, `A and B are`, `A, B and C are`, as used in casualty reports.
#[must_use]
pub fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} and {last}", rest.join(", ")),
    }
}

/// Headline for a ball leaving the park.
#[must_use]
pub fn home_run_headline(batter: &str, near_miss: bool, scorers: &[String]) -> String {
    let names = format_scorers(scorers);
    let verb = if scorers.len() == 1 { "scores" } else { "score" };
    match (scorers.len() == 4, near_miss) {
        (true, true) => format!(
            "💥 {batter} - It's a hit... THE BALL BARELY CLEARS THE FENCE! GRAND SLAM! 💥 {names} {verb}!"
        ),
        (true, false) => {
            format!("💥 {batter} SENDS IT INTO ORBIT! GRAND SLAM! 💥 {names} {verb}!")
        }
        (false, true) => format!(
            "{batter} - It's a hit... THE BALL BARELY CLEARS THE FENCE! HOME RUN! {names} {verb}!"
        ),
        (false, false) => {
            format!("{batter} SMASHES A HOME RUN OUT OF THE PARK! {names} {verb}!")
        }
    }
}

/// `1st`, `2nd`, `13th`.
#[must_use]
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// `win` for plural-looking team names, `wins` otherwise.
#[must_use]
pub fn win_verb(team_name: &str) -> &'static str {
    if team_name.ends_with('s') { "win" } else { "wins" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_format_scorers() {
        assert_eq!(format_scorers(&[]), "");
        assert_eq!(format_scorers(&names(&["A"])), "A");
        assert_eq!(format_scorers(&names(&["A", "B"])), "A and B");
        assert_eq!(format_scorers(&names(&["A", "B", "C"])), "A, B, and C");
    }

    #[test]
    fn test_join_names() {
        assert_eq!(join_names(&names(&["A", "B", "C"])), "A, B and C");
        assert_eq!(join_names(&names(&["A", "B"])), "A and B");
    }

    #[test]
    fn test_home_run_headlines() {
        let solo = home_run_headline("Vera Knox", false, &names(&["Vera Knox"]));
        assert_eq!(
            solo,
            "Vera Knox SMASHES A HOME RUN OUT OF THE PARK! Vera Knox scores!"
        );
        let slam = home_run_headline("D", true, &names(&["A", "B", "C", "D"]));
        assert!(slam.contains("GRAND SLAM"));
        assert!(slam.contains("A, B, C, and D score!"));
    }

    #[test]
    fn test_hit_description_matches_kind() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let line = hit_description(HitKind::Triple, "Vera Knox", &mut rng);
            assert!(line.starts_with("Vera Knox "));
            assert!(line.contains("triple"));
            assert!(line.ends_with(','));
        }
    }

    #[test]
    fn test_ordinal_and_verb() {
        assert_eq!(ordinal(9), "9th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(win_verb("Scorpions"), "win");
        assert_eq!(win_verb("The Aether"), "wins");
    }
}
