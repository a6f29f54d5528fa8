//! Ports (trait boundaries) for external dependencies.
//!
//! The simulation pipeline owns these traits; progress bars, exporters and
//! metrics collectors implement them.

pub mod observer;

pub use observer::GameObserver;
