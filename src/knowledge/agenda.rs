//! FIFO agenda of facts awaiting rule application

use std::collections::{HashSet, VecDeque};

use super::fact::Fact;

/// Pending facts in arrival order, plus every fact already processed.
///
/// Rules can re-derive a fact along several paths, so [`Agenda::next`] skips
/// anything seen before. Processing order is strictly breadth-first.
#[derive(Debug, Clone, Default)]
pub struct Agenda {
    pending: VecDeque<Fact>,
    processed: HashSet<Fact>,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fact at the back.
    pub fn push(&mut self, fact: Fact) {
        self.pending.push_back(fact);
    }

    pub fn extend(&mut self, facts: impl IntoIterator<Item = Fact>) {
        self.pending.extend(facts);
    }

    /// Pop the next fact that has not been processed yet and mark it
    /// processed.
    pub fn next(&mut self) -> Option<Fact> {
        while let Some(fact) = self.pending.pop_front() {
            if self.processed.insert(fact) {
                return Some(fact);
            }
        }
        None
    }

    /// Number of queued facts, duplicates included.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_processed(&self, fact: &Fact) -> bool {
        self.processed.contains(fact)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Fact> {
        self.pending.iter()
    }
}
