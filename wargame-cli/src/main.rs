//! Wargame CLI - Command-line interface
//!
//! Commands:
//! - play: One game between humans and/or the AI, with a trace file
//! - match: Many AI-vs-AI games with a win/draw summary

mod config;
mod human;
mod match_cmd;
mod play_cmd;
mod render;
mod trace;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wargame")]
#[command(about = "Attacker vs defender wargame with a minimax / alpha-beta AI")]
struct Cli {
    /// Log search progress (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play AI-vs-AI games and summarize the results
    Match(match_cmd::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Match(args) => match_cmd::run(args),
    }
}

/// `RUST_LOG` wins unless `--verbose` is given
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
