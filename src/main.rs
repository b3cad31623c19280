//! Fogscout CLI - Query attack targets and paths from recorded boards.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use fogscout::Coord;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Fogscout - attack planning under fog of war
#[derive(Parser, Debug)]
#[command(name = "fogscout")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging (otherwise RUST_LOG, default: info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank attack targets for a tile
    Target {
        /// Snapshot file (.json)
        #[arg(required = true)]
        snapshot: PathBuf,

        /// Attacking tile as x,y
        #[arg(long)]
        from: Coord,

        /// Heuristic weights file (.json)
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// Number of targets to list (default: 1)
        #[arg(short = 'n', long, default_value = "1")]
        top: usize,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Find a path the attacking army can capture
    Path {
        /// Snapshot file (.json)
        #[arg(required = true)]
        snapshot: PathBuf,

        /// Start tile as x,y
        #[arg(long)]
        from: Coord,

        /// Destination as x,y (default: best target)
        #[arg(long)]
        to: Option<Coord>,

        /// Allow routing through cities from the start
        #[arg(long)]
        cities: bool,

        /// Heuristic weights file used when picking a target
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Replay a snapshot and verify the board bookkeeping
    Check {
        /// Snapshot file (.json)
        #[arg(required = true)]
        snapshot: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Commands::Target {
            snapshot,
            from,
            weights,
            top,
            format,
        } => cli::target::execute(snapshot, from, weights, top, format),

        Commands::Path {
            snapshot,
            from,
            to,
            cities,
            weights,
            format,
        } => cli::path::execute(snapshot, from, to, cities, weights, format),

        Commands::Check { snapshot } => cli::check::execute(snapshot),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
