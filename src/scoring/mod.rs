//! Pump scoring module
//!
//! Turns a symbol's recent history and market snapshot into a composite
//! anomaly score with human-readable signal descriptions.

mod engine;
pub mod signals;
mod types;

pub use engine::{ScoreInput, ScoringConfig, ScoringEngine};
pub use types::{InsufficientData, ScoreMetrics, ScoreResult};
