//! smartcab CLI - train a Q-learning driving agent in a grid-world
//!
//! Runs a number of trips, then reports the penalty and deadline-overrun
//! histories collected at every trial boundary.

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smartcab")]
#[command(version, about = "Q-learning driving agent for a grid-world traffic simulation", long_about = None)]
struct Cli {
    /// Log every decision step (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent over a number of trials and report its histories
    Train(smartcab::cli::commands::train::TrainArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => {
            let common = args.common(cli.verbose);
            smartcab::cli::config::init_tracing(&common);
            smartcab::cli::commands::train::execute(args, &common)
        }
    }
}
