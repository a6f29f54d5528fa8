//! Knowledge representation and forward-chaining deduction
//!
//! The pieces, leaf to root:
//! - [`Fact`]: one atomic piece of evidence
//! - [`KnowledgeBase`]: tri-state card and hand knowledge, pending disproof
//!   sets and the shrinking set of candidate solutions
//! - [`Agenda`]: FIFO queue of facts plus the set of facts already processed
//! - [`InferenceEngine`]: drains the agenda, applying one rule per fact kind
//! - ingestion: turns observed game events into seed facts
//! - [`advisor`]: ranks suggestions by simulated information gain on clones

pub mod advisor;
pub mod agenda;
pub mod base;
pub mod engine;
pub mod fact;
pub mod ingest;

pub use advisor::{RankedSuggestion, evaluate_suggestion, fallback_suggestion, rank_suggestions};
pub use agenda::Agenda;
pub use base::{Contradiction, Knowledge, KnowledgeBase, KnowledgeSummary, Subject};
pub use engine::{InferenceEngine, InformationGain};
pub use fact::Fact;
pub use ingest::{AccusationOutcome, SuggestionOutcome};
