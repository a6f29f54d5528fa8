//! Cluedo CLI - simulate games between knowledge-based agents
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `warn`);
//! `--verbose` raises it to `debug`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cluedo")]
#[command(version, about = "Knowledge-based Cluedo agents", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play simulated games between knowledge-based agents
    Simulate(cluedo::cli::commands::simulate::SimulateArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate(args) => cluedo::cli::commands::simulate::execute(args),
    }
}
