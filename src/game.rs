//! Simulated Cluedo matches for exercising the agents.

pub mod deal;
pub mod session;

pub use deal::Deal;
pub use session::{Match, MatchRecord, TurnEvent};
