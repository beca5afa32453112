//! Output formatting utilities for CLI.

use super::CliError;
use basebrawl::{GameOutcome, GameReport, SeriesStats, Side};
use serde::Serialize;

/// Format a finished game as its play-by-play plus a one-line summary.
pub(super) fn format_play_text(report: &GameReport) -> String {
    let mut output = String::new();
    for line in &report.log {
        output.push_str(line);
        output.push('\n');
    }

    let verdict = match report.outcome {
        GameOutcome::Winner { .. } => "final",
        GameOutcome::Tie => "tie",
        GameOutcome::Forfeit { .. } => "forfeit",
    };
    output.push_str(&format!(
        "\nFinal ({verdict}): {} {} - {} {} after {} innings (seed: {})\n",
        report.away,
        report.score.away,
        report.home,
        report.score.home,
        report.innings,
        report.seed
    ));
    output
}

/// JSON-serializable series result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSeriesResult {
    /// Away team name.
    pub(super) away: String,
    /// Home team name.
    pub(super) home: String,
    /// Seed of the first game.
    pub(super) base_seed: u64,
    /// Raw totals.
    #[serde(flatten)]
    pub(super) stats: SeriesStats,
    /// Away win rate (0.0-1.0).
    pub(super) away_win_rate: f64,
    /// Home win rate (0.0-1.0).
    pub(super) home_win_rate: f64,
    /// Tie rate (0.0-1.0).
    pub(super) tie_rate: f64,
    /// Away runs per game.
    pub(super) avg_away_runs: f64,
    /// Home runs per game.
    pub(super) avg_home_runs: f64,
}

impl JsonSeriesResult {
    /// Create from aggregated stats.
    pub(super) fn from_stats(stats: &SeriesStats, away: &str, home: &str, base_seed: u64) -> Self {
        Self {
            away: away.to_string(),
            home: home.to_string(),
            base_seed,
            stats: *stats,
            away_win_rate: stats.win_rate(Side::Away),
            home_win_rate: stats.win_rate(Side::Home),
            tie_rate: stats.tie_rate(),
            avg_away_runs: stats.avg_runs(Side::Away),
            avg_home_runs: stats.avg_runs(Side::Home),
        }
    }
}

/// Format series stats as human-readable text.
pub(super) fn format_series_text(
    stats: &SeriesStats,
    away: &str,
    home: &str,
    base_seed: u64,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Series Results: {away} @ {home} ({} games, seed {base_seed})\n",
        stats.games
    ));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    output.push_str(&format!(
        "  {away} (away): {:.1}% ({} wins)\n",
        stats.win_rate(Side::Away) * 100.0,
        stats.away_wins
    ));
    output.push_str(&format!(
        "  {home} (home): {:.1}% ({} wins)\n",
        stats.win_rate(Side::Home) * 100.0,
        stats.home_wins
    ));
    output.push_str(&format!(
        "  Ties: {} ({:.1}%)\n",
        stats.ties,
        stats.tie_rate() * 100.0
    ));
    output.push_str(&format!("  Forfeits: {}\n\n", stats.forfeits));

    output.push_str("Average Runs:\n");
    output.push_str(&format!("  {away}: {:.2}\n", stats.avg_runs(Side::Away)));
    output.push_str(&format!("  {home}: {:.2}\n\n", stats.avg_runs(Side::Home)));

    output.push_str("Casualties:\n");
    output.push_str(&format!("  {away}: {} dead\n", stats.away_deaths));
    output.push_str(&format!("  {home}: {} dead\n", stats.home_deaths));

    output.push_str(&format!(
        "\nExtra-Inning Games: {}\n",
        stats.extra_inning_games
    ));

    output
}

#[derive(Serialize)]
struct CsvSeriesRow<'a> {
    team: &'a str,
    side: Side,
    wins: u64,
    win_rate: f64,
    avg_runs: f64,
    deaths: u64,
}

/// Format series stats as CSV, one row per team.
pub(super) fn format_series_csv(
    stats: &SeriesStats,
    away: &str,
    home: &str,
) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let rows = [
        CsvSeriesRow {
            team: away,
            side: Side::Away,
            wins: stats.away_wins,
            win_rate: stats.win_rate(Side::Away),
            avg_runs: stats.avg_runs(Side::Away),
            deaths: stats.away_deaths,
        },
        CsvSeriesRow {
            team: home,
            side: Side::Home,
            wins: stats.home_wins,
            win_rate: stats.win_rate(Side::Home),
            avg_runs: stats.avg_runs(Side::Home),
            deaths: stats.home_deaths,
        },
    ];
    for row in &rows {
        writer
            .serialize(row)
            .map_err(|e| CliError::new(format!("CSV serialization failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::new(format!("CSV serialization failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| CliError::new(format!("CSV output is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SeriesStats {
        SeriesStats {
            games: 4,
            away_wins: 3,
            home_wins: 1,
            away_runs: 20,
            home_runs: 8,
            away_deaths: 2,
            ..SeriesStats::default()
        }
    }

    #[test]
    fn test_series_csv_has_a_row_per_team() {
        let csv = format_series_csv(&sample(), "Scorpions", "Aether").unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "team,side,wins,win_rate,avg_runs,deaths");
        assert_eq!(lines[1], "Scorpions,away,3,0.75,5.0,2");
        assert_eq!(lines[2], "Aether,home,1,0.25,2.0,0");
    }

    #[test]
    fn test_series_text_mentions_both_teams() {
        let text = format_series_text(&sample(), "Scorpions", "Aether", 7);
        assert!(text.contains("Scorpions (away): 75.0% (3 wins)"));
        assert!(text.contains("Aether (home): 25.0% (1 wins)"));
        assert!(text.contains("Scorpions: 2 dead"));
    }

    #[test]
    fn test_series_json_flattens_totals() {
        let result = JsonSeriesResult::from_stats(&sample(), "A", "B", 9);
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["games"], 4);
        assert_eq!(json["away_wins"], 3);
        assert_eq!(json["base_seed"], 9);
    }
}
