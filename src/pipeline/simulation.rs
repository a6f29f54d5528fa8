//! Simulation pipeline: many seeded matches between knowledge-based agents

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    config::GameConfig,
    game::{Match, MatchRecord, TurnEvent},
    identifiers::PlayerId,
    ports::GameObserver,
    utils::{build_rng, ratio},
};

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Total games played
    pub total_games: usize,

    /// Wins per seat, indexed by seat
    pub wins_per_seat: Vec<usize>,

    /// Games that hit the turn limit
    pub stalemates: usize,

    /// Accusations that eliminated the accuser
    pub wrong_accusations: usize,

    /// Mean number of turns per game
    pub average_turns: f64,

    /// Mean number of suggestions per game
    pub average_suggestions: f64,
}

impl SimulationResult {
    /// Summarise the records of a run.
    pub fn from_records(num_players: usize, records: &[MatchRecord]) -> Self {
        let mut wins_per_seat = vec![0; num_players];
        let mut stalemates = 0;
        let mut wrong_accusations = 0;
        let mut turns = 0;
        let mut suggestions = 0;

        for record in records {
            match record.winner {
                Some(seat) => {
                    if let Some(wins) = wins_per_seat.get_mut(seat.index()) {
                        *wins += 1;
                    }
                }
                None => stalemates += 1,
            }
            wrong_accusations += record.wrong_accusations;
            turns += record.turns;
            suggestions += record.suggestions;
        }

        Self {
            total_games: records.len(),
            wins_per_seat,
            stalemates,
            wrong_accusations,
            average_turns: ratio(turns, records.len()),
            average_suggestions: ratio(suggestions, records.len()),
        }
    }

    /// Share of games won by `seat`.
    pub fn win_rate(&self, seat: PlayerId) -> f64 {
        let wins = self.wins_per_seat.get(seat.index()).copied().unwrap_or(0);
        ratio(wins, self.total_games)
    }

    pub fn stalemate_rate(&self) -> f64 {
        ratio(self.stalemates, self.total_games)
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Plays a batch of matches and reports to observers
pub struct SimulationPipeline {
    config: GameConfig,
    games: usize,
    observers: Vec<Box<dyn GameObserver>>,
}

impl SimulationPipeline {
    /// Create a pipeline playing `games` matches with `config`
    pub fn new(config: GameConfig, games: usize) -> Self {
        Self {
            config,
            games,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn GameObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Play every game.
    ///
    /// All randomness comes from one RNG seeded by the config, so a seeded
    /// run is reproducible.
    pub fn run(&mut self) -> Result<SimulationResult> {
        self.config.validate()?;
        let mut rng = build_rng(self.config.seed);
        let mut records = Vec::with_capacity(self.games);

        for observer in &mut self.observers {
            observer.on_run_start(self.games)?;
        }

        for game_num in 0..self.games {
            for observer in &mut self.observers {
                observer.on_game_start(game_num)?;
            }

            let mut game = Match::from_config(&self.config, &mut rng)?;
            let observers = &mut self.observers;
            let record = game.run_with(|event| {
                for observer in observers.iter_mut() {
                    match event {
                        TurnEvent::Suggestion(outcome) => observer.on_suggestion(game_num, outcome)?,
                        TurnEvent::Accusation(outcome) => observer.on_accusation(game_num, outcome)?,
                    }
                }
                Ok(())
            })?;

            tracing::debug!(
                game = game_num,
                winner = ?record.winner.map(PlayerId::index),
                turns = record.turns,
                "game finished"
            );
            for observer in &mut self.observers {
                observer.on_game_end(game_num, &record)?;
            }
            records.push(record);
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        let result = SimulationResult::from_records(self.config.players, &records);
        tracing::info!(
            games = result.total_games,
            stalemates = result.stalemates,
            wrong_accusations = result.wrong_accusations,
            "simulation complete"
        );
        Ok(result)
    }
}
