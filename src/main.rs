//! Basebrawl CLI - play games and series from a roster file.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Basebrawl - baseball where the benches clear
#[derive(Parser, Debug)]
#[command(name = "basebrawl")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one game and print the play-by-play
    Play {
        /// Roster CSV file
        #[arg(short, long, default_value = "data/players.csv")]
        roster: PathBuf,

        /// Away team (default: random)
        #[arg(long)]
        away: Option<String>,

        /// Home team (default: random)
        #[arg(long)]
        home: Option<String>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Regulation innings
        #[arg(long, default_value = "9")]
        innings: u32,

        /// Last extra inning before a tie
        #[arg(long, default_value = "13")]
        max_innings: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::PlayFormat,
    },

    /// Play many games between two teams and aggregate the results
    Series {
        /// Roster CSV file
        #[arg(short, long, default_value = "data/players.csv")]
        roster: PathBuf,

        /// Away team
        #[arg(long)]
        away: String,

        /// Home team
        #[arg(long)]
        home: String,

        /// Number of games to play
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Regulation innings
        #[arg(long, default_value = "9")]
        innings: u32,

        /// Last extra inning before a tie
        #[arg(long, default_value = "13")]
        max_innings: u32,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SeriesFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Check a roster file and list its teams
    Validate {
        /// Roster CSV file
        #[arg(required = true)]
        roster: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            roster,
            away,
            home,
            seed,
            innings,
            max_innings,
            format,
        } => cli::play::execute(&roster, away, home, seed, innings, max_innings, format),

        Commands::Series {
            roster,
            away,
            home,
            games,
            seed,
            threads,
            innings,
            max_innings,
            format,
            progress,
        } => cli::series::execute(&cli::series::SeriesOptions {
            roster,
            away,
            home,
            games,
            seed,
            threads,
            innings,
            max_innings,
            format,
            progress,
        }),

        Commands::Validate { roster } => cli::validate::execute(&roster),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
