//! Knowledge-based Cluedo agent
//!
//! This crate provides:
//! - A card registry with `Copy` handles for cards and seats
//! - A forward-chaining inference engine over a tri-state knowledge base
//! - Evidence ingestion from suggestion and accusation outcomes
//! - A suggestion advisor that scores candidates by simulated information gain
//! - A minimal match harness, simulation pipeline and CLI for exercising agents
//!
//! # Example
//!
//! ```
//! use cluedo::{CardDeck, Category, InferenceEngine, PlayerId};
//!
//! let deck = CardDeck::classic().shared();
//! let mut engine = InferenceEngine::new(deck.clone(), 3, PlayerId::new(0)).unwrap();
//! let knife = deck.find(Category::Weapon, "Knife").unwrap();
//! engine.ingest_hand(&[knife]).unwrap();
//! engine.run().unwrap();
//! assert_eq!(engine.knowledge().candidate_count(), 6 * 5 * 9);
//! ```

pub mod agent;
pub mod cards;
pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod identifiers;
pub mod knowledge;
pub mod pipeline;
pub mod ports;
pub mod utils;

pub use agent::KrAgent;
pub use cards::{Card, CardDeck, Category, Triple};
pub use config::{AgentConfig, GameConfig};
pub use error::{Error, Result};
pub use game::{Deal, Match, MatchRecord, TurnEvent};
pub use identifiers::{CardId, PlayerId};
pub use knowledge::{
    AccusationOutcome, Fact, InferenceEngine, InformationGain, Knowledge, KnowledgeBase,
    KnowledgeSummary, RankedSuggestion, SuggestionOutcome,
};
