//! Simulation pipeline abstractions
//!
//! This module provides:
//! - A pipeline playing many seeded matches between knowledge-based agents
//! - Observers recording progress, metrics and per-game exports

pub mod observers;
pub mod simulation;

pub use observers::{
    AccusationObservation, JsonlObserver, MetricsObserver, MetricsSummary, Observation,
    ProgressObserver, SuggestionObservation,
};
pub use simulation::{SimulationPipeline, SimulationResult};

pub use crate::ports::GameObserver;
