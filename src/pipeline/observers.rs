//! Observers for simulation runs
//!
//! Observers allow composable data collection during a simulation without
//! coupling the pipeline to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::Arc,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    cards::CardDeck,
    game::MatchRecord,
    knowledge::{AccusationOutcome, SuggestionOutcome},
    ports::GameObserver,
    utils::ratio,
};

/// One suggestion as recorded in an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionObservation {
    /// Seat index of the suggester
    pub suggester: usize,
    /// "(suspect, weapon, room)"
    pub suggestion: String,
    /// Seat index of the player who showed a card
    pub responder: Option<usize>,
    /// Name of the card shown
    pub shown: Option<String>,
}

/// One accusation as recorded in an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccusationObservation {
    pub accuser: usize,
    pub accusation: String,
    pub correct: bool,
}

/// Complete observation of a simulated game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Game number
    pub game_num: usize,
    /// Winning seat index, if any
    pub winner: Option<usize>,
    /// The hidden solution
    pub solution: String,
    /// Turns played
    pub turns: usize,
    /// Suggestions in the order they were made
    pub suggestions: Vec<SuggestionObservation>,
    /// Accusations in the order they were made
    pub accusations: Vec<AccusationObservation>,
}

/// Progress bar observer - Shows simulation progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    decided: usize,
    stalemates: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            decided: 0,
            stalemates: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} stalemates:{}", self.decided, self.stalemates)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl GameObserver for ProgressObserver {
    fn on_run_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games (won:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, record: &MatchRecord) -> Result<()> {
        if record.is_stalemate() {
            self.stalemates += 1;
        } else {
            self.decided += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcome and pace metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    total_games: usize,
    wins_per_seat: Vec<usize>,
    stalemates: usize,
    wrong_accusations: usize,
    turn_counts: Vec<usize>,
    suggestion_counts: Vec<usize>,
    unanswered: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Average game length in turns
    pub fn avg_game_length(&self) -> f64 {
        ratio(self.turn_counts.iter().sum(), self.turn_counts.len())
    }

    /// Average number of suggestions per game
    pub fn avg_suggestions(&self) -> f64 {
        ratio(self.suggestion_counts.iter().sum(), self.suggestion_counts.len())
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let suggestions: usize = self.suggestion_counts.iter().sum();
        MetricsSummary {
            total_games: self.total_games,
            wins_per_seat: self.wins_per_seat.clone(),
            stalemates: self.stalemates,
            wrong_accusations: self.wrong_accusations,
            stalemate_rate: ratio(self.stalemates, self.total_games),
            avg_game_length: self.avg_game_length(),
            avg_suggestions: self.avg_suggestions(),
            unanswered_rate: ratio(self.unanswered, suggestions),
        }
    }
}

/// Summary of simulation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub wins_per_seat: Vec<usize>,
    pub stalemates: usize,
    pub wrong_accusations: usize,
    pub stalemate_rate: f64,
    pub avg_game_length: f64,
    pub avg_suggestions: f64,
    /// Share of suggestions nobody could disprove
    pub unanswered_rate: f64,
}

impl GameObserver for MetricsObserver {
    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        self.suggestion_counts.push(0);
        Ok(())
    }

    fn on_suggestion(&mut self, _game_num: usize, outcome: &SuggestionOutcome) -> Result<()> {
        if let Some(last) = self.suggestion_counts.last_mut() {
            *last += 1;
        }
        if outcome.responder.is_none() {
            self.unanswered += 1;
        }
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, record: &MatchRecord) -> Result<()> {
        self.total_games += 1;
        self.turn_counts.push(record.turns);
        self.wrong_accusations += record.wrong_accusations;
        match record.winner {
            Some(seat) => {
                if self.wins_per_seat.len() <= seat.index() {
                    self.wins_per_seat.resize(seat.index() + 1, 0);
                }
                self.wins_per_seat[seat.index()] += 1;
            }
            None => self.stalemates += 1,
        }
        Ok(())
    }
}

/// JSONL observer - Exports one observation per game in JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    deck: Arc<CardDeck>,
    suggestions: Vec<SuggestionObservation>,
    accusations: Vec<AccusationObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer. Card names are resolved against `deck`.
    pub fn new<P: AsRef<Path>>(path: P, deck: Arc<CardDeck>) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            deck,
            suggestions: Vec::new(),
            accusations: Vec::new(),
        })
    }
}

impl GameObserver for JsonlObserver {
    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        self.suggestions.clear();
        self.accusations.clear();
        Ok(())
    }

    fn on_suggestion(&mut self, _game_num: usize, outcome: &SuggestionOutcome) -> Result<()> {
        self.suggestions.push(SuggestionObservation {
            suggester: outcome.suggester.index(),
            suggestion: self.deck.describe(&outcome.triple),
            responder: outcome.responder.map(|p| p.index()),
            shown: outcome.shown.map(|card| self.deck.name(card).to_string()),
        });
        Ok(())
    }

    fn on_accusation(&mut self, _game_num: usize, outcome: &AccusationOutcome) -> Result<()> {
        self.accusations.push(AccusationObservation {
            accuser: outcome.accuser.index(),
            accusation: self.deck.describe(&outcome.triple),
            correct: outcome.correct,
        });
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, record: &MatchRecord) -> Result<()> {
        let observation = Observation {
            game_num,
            winner: record.winner.map(|p| p.index()),
            solution: self.deck.describe(&record.solution),
            turns: record.turns,
            suggestions: std::mem::take(&mut self.suggestions),
            accusations: std::mem::take(&mut self.accusations),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GameConfig, pipeline::SimulationPipeline};

    #[test]
    fn jsonl_writes_one_line_per_game() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.jsonl");
        let config = GameConfig::new().with_seed(8);
        let deck = config.deck().unwrap().shared();

        let observer = JsonlObserver::new(&path, deck).unwrap();
        let result = SimulationPipeline::new(config, 3)
            .with_observer(Box::new(observer))
            .run()
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let games: Vec<Observation> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(games.len(), 3);
        for (index, game) in games.iter().enumerate() {
            assert_eq!(game.game_num, index);
            assert!(!game.suggestions.is_empty());
            assert!(game.solution.starts_with('('));
        }
        let total_turns: usize = games.iter().map(|g| g.turns).sum();
        assert_eq!(total_turns as f64 / 3.0, result.average_turns);
    }

    #[test]
    fn metrics_track_outcomes() {
        let mut metrics = MetricsObserver::new();
        let deck = CardDeck::classic();
        let solution = deck.triple("Mr. Green", "Rope", "Hall").unwrap();
        let won = MatchRecord {
            winner: Some(crate::identifiers::PlayerId::new(2)),
            turns: 10,
            solution,
            suggestions: 8,
            accusations: 1,
            wrong_accusations: 0,
        };
        let stalled = MatchRecord {
            winner: None,
            turns: 20,
            ..won.clone()
        };

        metrics.on_game_start(0).unwrap();
        metrics.on_game_end(0, &won).unwrap();
        metrics.on_game_start(1).unwrap();
        metrics.on_game_end(1, &stalled).unwrap();

        let summary = metrics.summary();
        assert_eq!(summary.total_games, 2);
        assert_eq!(summary.wins_per_seat, vec![0, 0, 1]);
        assert_eq!(summary.stalemates, 1);
        assert_eq!(summary.avg_game_length, 15.0);
    }
}
