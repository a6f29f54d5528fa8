//! Configuration types for agents and games.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, cards::CardDeck};

/// Configuration for creating a knowledge-based agent.
///
/// # Examples
///
/// ```
/// use cluedo::config::AgentConfig;
///
/// let config = AgentConfig::new().with_seed(42);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Random seed for card disclosure, destinations and fallback suggestions
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Configuration of a simulated game.
///
/// Uses default values for missing fields when loaded from JSON:
/// - 3 players
/// - 6 suspects and 6 weapons (the nine rooms are fixed)
/// - 500 turns before a game is called a stalemate
/// - no seed (non-deterministic)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of seats at the table
    pub players: usize,
    /// Number of suspect cards
    pub suspects: usize,
    /// Number of weapon cards
    pub weapons: usize,
    /// Turn limit
    pub max_turns: usize,
    /// Random seed for dealing and agent behavior
    pub seed: Option<u64>,
}

impl GameConfig {
    pub const MIN_PLAYERS: usize = 2;
    pub const MAX_PLAYERS: usize = 6;
    pub const MIN_CARDS: usize = 3;
    pub const MAX_CARDS: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    /// Set the number of suspects and weapons.
    pub fn with_deck(mut self, suspects: usize, weapons: usize) -> Self {
        self.suspects = suspects;
        self.weapons = weapons;
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field against the supported ranges.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(Self::MIN_PLAYERS..=Self::MAX_PLAYERS).contains(&self.players) {
            return invalid(format!(
                "players must be between {} and {}, got {}",
                Self::MIN_PLAYERS,
                Self::MAX_PLAYERS,
                self.players
            ));
        }
        for (label, count) in [("suspects", self.suspects), ("weapons", self.weapons)] {
            if !(Self::MIN_CARDS..=Self::MAX_CARDS).contains(&count) {
                return invalid(format!(
                    "{label} must be between {} and {}, got {count}",
                    Self::MIN_CARDS,
                    Self::MAX_CARDS
                ));
            }
        }
        if self.max_turns == 0 {
            return invalid("max_turns must be positive".to_string());
        }
        Ok(())
    }

    /// Build the deck this configuration plays with.
    pub fn deck(&self) -> Result<CardDeck> {
        CardDeck::with_counts(self.suspects, self.weapons)
    }

    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: GameConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: 3,
            suspects: 6,
            weapons: 6,
            max_turns: 500,
            seed: None,
        }
    }
}
