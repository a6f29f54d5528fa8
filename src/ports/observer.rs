//! Observer port - abstraction for watching simulated matches
//!
//! Observers collect data while the simulation pipeline plays games, without
//! the pipeline knowing about progress bars, files or metrics.

use std::sync::{Arc, Mutex};

use crate::{
    Error, Result,
    game::MatchRecord,
    knowledge::{AccusationOutcome, SuggestionOutcome},
};

/// Observer trait for monitoring a simulation run
///
/// # Event Sequence
///
/// 1. `on_run_start(total_games)` - Once at the beginning
/// 2. For each game:
///    - `on_game_start(game_num)`
///    - `on_suggestion(...)` / `on_accusation(...)` - In the order they happen
///    - `on_game_end(game_num, record)`
/// 3. `on_run_end()` - Once at the end
///
/// Events carry the full outcome, including the card shown, as the referee
/// saw it.
///
/// # Examples
///
/// ```no_run
/// use cluedo::{game::MatchRecord, ports::GameObserver};
///
/// struct StalemateCounter {
///     stalemates: usize,
/// }
///
/// impl GameObserver for StalemateCounter {
///     fn on_game_end(&mut self, _game_num: usize, record: &MatchRecord) -> cluedo::Result<()> {
///         if record.is_stalemate() {
///             self.stalemates += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait GameObserver: Send {
    /// Called once before the first game.
    fn on_run_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a game starts. `game_num` is 0-based.
    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        Ok(())
    }

    /// Called after a suggestion has been answered.
    fn on_suggestion(&mut self, _game_num: usize, _outcome: &SuggestionOutcome) -> Result<()> {
        Ok(())
    }

    /// Called after an accusation has been checked.
    fn on_accusation(&mut self, _game_num: usize, _outcome: &AccusationOutcome) -> Result<()> {
        Ok(())
    }

    /// Called when a game ends, by accusation or by turn limit.
    fn on_game_end(&mut self, _game_num: usize, _record: &MatchRecord) -> Result<()> {
        Ok(())
    }

    /// Called once after the last game. Use this to flush outputs.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Shared observers, so a caller can keep a handle and read the observer
/// after the run.
impl<T: GameObserver> GameObserver for Arc<Mutex<T>> {
    fn on_run_start(&mut self, total_games: usize) -> Result<()> {
        lock(self)?.on_run_start(total_games)
    }

    fn on_game_start(&mut self, game_num: usize) -> Result<()> {
        lock(self)?.on_game_start(game_num)
    }

    fn on_suggestion(&mut self, game_num: usize, outcome: &SuggestionOutcome) -> Result<()> {
        lock(self)?.on_suggestion(game_num, outcome)
    }

    fn on_accusation(&mut self, game_num: usize, outcome: &AccusationOutcome) -> Result<()> {
        lock(self)?.on_accusation(game_num, outcome)
    }

    fn on_game_end(&mut self, game_num: usize, record: &MatchRecord) -> Result<()> {
        lock(self)?.on_game_end(game_num, record)
    }

    fn on_run_end(&mut self) -> Result<()> {
        lock(self)?.on_run_end()
    }
}

fn lock<T>(shared: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>> {
    shared.lock().map_err(|_| Error::ObserverPoisoned)
}
