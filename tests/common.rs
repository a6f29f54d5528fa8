//! Common helpers for the cluedo test suite.

#![allow(dead_code)]

use std::sync::Arc;

use cluedo::{CardDeck, CardId, Category, InferenceEngine, PlayerId, Triple};

/// Engine for `owner` at a classic-deck table of `players`.
pub fn classic_engine(owner: usize, players: usize) -> InferenceEngine {
    InferenceEngine::new(CardDeck::classic().shared(), players, PlayerId::new(owner)).unwrap()
}

/// Look up a card by category and name.
pub fn card(deck: &CardDeck, category: Category, name: &str) -> CardId {
    deck.find(category, name).unwrap()
}

/// Look up a triple by names.
pub fn triple(deck: &CardDeck, suspect: &str, weapon: &str, room: &str) -> Triple {
    deck.triple(suspect, weapon, room).unwrap()
}

/// Shared handle to the engine's deck.
pub fn deck_of(engine: &InferenceEngine) -> Arc<CardDeck> {
    Arc::clone(engine.deck())
}
