//! Developer CLI for rotation engines.
//!
//! Replays scripted scenarios through a rotation and prints what the engine
//! decided on every tick. Run with: `rotation-replay <command>`
//! (`RUST_LOG=runtime=debug` shows per-tick engine logs).

mod commands;
mod scenario;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Run};

/// Developer tools for rotation engines
#[derive(Parser)]
#[command(name = "rotation-replay")]
#[command(about = "Replay and inspect combat rotations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Replay a scenario tick by tick
    Run(Run),

    /// Validate a rotation file and print its tree
    Check(Check),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::Check(cmd) => cmd.execute(),
    }
}
