//! Series command implementation.

use super::output::{JsonSeriesResult, format_series_csv, format_series_text};
use super::{CliError, SeriesFormat, game_config};
use basebrawl::{load_rosters, run_series};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

/// Flags for the series command.
#[derive(Debug)]
pub(crate) struct SeriesOptions {
    pub(crate) roster: PathBuf,
    pub(crate) away: String,
    pub(crate) home: String,
    pub(crate) games: u64,
    pub(crate) seed: Option<u64>,
    pub(crate) threads: Option<usize>,
    pub(crate) innings: u32,
    pub(crate) max_innings: u32,
    pub(crate) format: SeriesFormat,
    pub(crate) progress: bool,
}

/// Execute the series command.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded or a team is missing.
pub(crate) fn execute(options: &SeriesOptions) -> Result<(), CliError> {
    let rosters = load_rosters(&options.roster)?;
    let away = rosters.team(&options.away)?;
    let home = rosters.team(&options.home)?;

    // Set thread pool size if specified
    if let Some(num_threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = options.seed.unwrap_or_else(rand::random);
    let config = game_config(options.innings, options.max_innings, None)?;

    let pb = if options.progress {
        let pb = ProgressBar::new(options.games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_series(&away, &home, config, options.games, base_seed)?;

    // Update progress bar after completion (no atomic overhead in hot path)
    if let Some(pb) = pb {
        pb.set_position(stats.games);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    match options.format {
        SeriesFormat::Text => {
            println!();
            print!("{}", format_series_text(&stats, &away.name, &home.name, base_seed));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        SeriesFormat::Json => {
            let json_result = JsonSeriesResult::from_stats(&stats, &away.name, &home.name, base_seed);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
        SeriesFormat::Csv => {
            print!("{}", format_series_csv(&stats, &away.name, &home.name)?);
        }
    }

    Ok(())
}
