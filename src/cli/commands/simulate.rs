//! Simulate command - Play games between knowledge-based agents

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    cli::output::{format_number, format_percent, print_kv, print_section, print_subsection},
    config::GameConfig,
    identifiers::PlayerId,
    pipeline::{JsonlObserver, MetricsObserver, ProgressObserver, SimulationPipeline},
};

#[derive(Parser, Debug, Default)]
#[command(about = "Play simulated games between knowledge-based agents")]
pub struct SimulateArgs {
    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Number of players (2-6)
    #[arg(long, short = 'p')]
    pub players: Option<usize>,

    /// Number of suspect cards (3-10)
    #[arg(long)]
    pub suspects: Option<usize>,

    /// Number of weapon cards (3-10)
    #[arg(long)]
    pub weapons: Option<usize>,

    /// Turn limit before a game is a stalemate
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Game configuration file (JSON); flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Write one JSON line per game to this file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Game configuration from the config file, overridden by explicit flags.
pub fn resolve_config(args: &SimulateArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(players) = args.players {
        config.players = players;
    }
    if let Some(suspects) = args.suspects {
        config.suspects = suspects;
    }
    if let Some(weapons) = args.weapons {
        config.weapons = weapons;
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    config.validate().context("invalid game configuration")?;
    Ok(config)
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    print_section("Cluedo Simulation");
    print_kv("Games", &format_number(args.games));
    print_kv("Players", &config.players.to_string());
    print_kv(
        "Deck",
        &format!("{} suspects, {} weapons, 9 rooms", config.suspects, config.weapons),
    );
    print_kv("Turn limit", &format_number(config.max_turns));
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut pipeline =
        SimulationPipeline::new(config.clone(), args.games).with_observer(Box::new(Arc::clone(&metrics)));
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.export {
        let deck = config.deck()?.shared();
        let observer = JsonlObserver::new(path, deck)
            .with_context(|| format!("failed to create export file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run()?;
    let summary = metrics
        .lock()
        .map_err(|_| anyhow!("metrics observer lock poisoned"))?
        .summary();

    print_subsection("Results");
    for seat in PlayerId::all(config.players) {
        let wins = result.wins_per_seat.get(seat.index()).copied().unwrap_or(0);
        print_kv(
            &seat.to_string(),
            &format!("{} wins ({})", format_number(wins), format_percent(result.win_rate(seat))),
        );
    }
    print_kv(
        "Stalemates",
        &format!(
            "{} ({})",
            format_number(result.stalemates),
            format_percent(result.stalemate_rate())
        ),
    );
    print_kv("Wrong accusations", &format_number(result.wrong_accusations));
    print_kv("Average turns", &format!("{:.1}", result.average_turns));
    print_kv("Average suggestions", &format!("{:.1}", summary.avg_suggestions));
    print_kv("Unanswered", &format_percent(summary.unanswered_rate));

    if let Some(path) = &args.export {
        println!("\nGame log written to {}", path.display());
    }
    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }
    Ok(())
}
