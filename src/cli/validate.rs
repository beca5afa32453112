//! Roster validation command implementation.

use super::CliError;
use basebrawl::load_rosters;
use std::path::Path;

/// Players needed to field every position and bat a full order.
const FULL_SQUAD: usize = 9;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the roster cannot be read or holds fewer than two teams.
pub(crate) fn execute(roster: &Path) -> Result<(), CliError> {
    println!("Validating: {}", roster.display());
    println!();

    let rosters = load_rosters(roster)?;
    print_check("CSV parses with valid stats", true);

    for team in rosters.teams() {
        let count = team.players.len();
        let full = count >= FULL_SQUAD;
        let symbol = if full { "✓" } else { "!" };
        let note = if full { "" } else { " (short-handed)" };
        println!("  {symbol} {}: {count} players{note}", team.name);
    }

    let enough = rosters.len() >= 2;
    print_check("At least two teams", enough);
    if !enough {
        return Err(CliError::new(format!(
            "Roster has {} team(s); a game needs two",
            rosters.len()
        )));
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
