//! Scoring result types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw sub-signal metrics behind a score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreMetrics {
    pub short_term_price_increase_pct: f64,
    pub volume_increase_pct: f64,
    pub order_book_imbalance: f64,
    pub trade_velocity: f64,
    pub buy_pressure_pct: f64,
}

/// Composite anomaly score for one symbol in one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub symbol: String,
    /// Sum of all contributed sub-signal points
    pub composite_score: f64,
    /// Descriptions of triggered sub-signals, in evaluation order
    pub signals: Vec<String>,
    pub metrics: ScoreMetrics,
    /// Whether the composite score exceeded the pump threshold
    pub is_pump_candidate: bool,
}

/// Not enough history to score a symbol
///
/// A skip, not a failure: the symbol is neither a candidate nor a
/// non-candidate for this scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient history: {prices} prices, {volumes} volumes (need {required})")]
pub struct InsufficientData {
    pub prices: usize,
    pub volumes: usize,
    pub required: usize,
}
