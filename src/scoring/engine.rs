//! Composite pump scoring
//!
//! Combines five independent sub-signals into one score. The engine is pure:
//! it holds only thresholds and never touches shared state.

use super::signals::{
    buy_pressure, order_book_imbalance, price_momentum, trade_velocity, volume_spike,
};
use super::types::{InsufficientData, ScoreMetrics, ScoreResult};
use crate::config::DetectionConfig;
use crate::feed::{OrderBook, Trade};
use chrono::{DateTime, Utc};

/// Thresholds for the scoring engine
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Samples required in both histories (default: 10)
    pub min_samples: usize,
    /// Momentum trigger (default: 2%)
    pub min_price_increase_pct: f64,
    /// Volume spike trigger (default: 150%)
    pub min_volume_increase_pct: f64,
    /// Imbalance trigger (default: 1.5x)
    pub imbalance_threshold: f64,
    /// Velocity trigger (default: 2.5x)
    pub velocity_threshold: f64,
    /// Buy pressure trigger (default: 60%)
    pub min_buy_pressure_pct: f64,
    /// Composite score a candidate must exceed (default: 50)
    pub pump_score_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::from(&DetectionConfig::default())
    }
}

impl From<&DetectionConfig> for ScoringConfig {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            min_samples: config.min_samples,
            min_price_increase_pct: config.min_price_increase_pct,
            min_volume_increase_pct: config.min_volume_increase_pct,
            imbalance_threshold: config.imbalance_threshold,
            velocity_threshold: config.velocity_threshold,
            min_buy_pressure_pct: config.min_buy_pressure_pct,
            pump_score_threshold: config.pump_score_threshold,
        }
    }
}

/// Inputs for scoring one symbol
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub symbol: &'a str,
    /// Price history, oldest first
    pub prices: &'a [f64],
    /// Volume history, oldest first
    pub volumes: &'a [f64],
    pub order_book: Option<&'a OrderBook>,
    /// Recent trades, oldest first
    pub trades: Option<&'a [Trade]>,
    /// Reference time for trade ages
    pub now: DateTime<Utc>,
}

/// Multi-factor pump scoring engine
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Create an engine with default thresholds
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one symbol
    ///
    /// Returns [`InsufficientData`] when either history holds fewer than
    /// `min_samples` values, regardless of the other inputs.
    pub fn score(&self, input: ScoreInput<'_>) -> Result<ScoreResult, InsufficientData> {
        let required = self.config.min_samples;
        if input.prices.len() < required || input.volumes.len() < required {
            return Err(InsufficientData {
                prices: input.prices.len(),
                volumes: input.volumes.len(),
                required,
            });
        }

        let momentum = price_momentum(input.prices, self.config.min_price_increase_pct);
        let volume = volume_spike(input.volumes, self.config.min_volume_increase_pct);
        let imbalance = order_book_imbalance(input.order_book, self.config.imbalance_threshold);
        let velocity = trade_velocity(input.trades, input.now, self.config.velocity_threshold);
        let pressure = buy_pressure(input.trades, self.config.min_buy_pressure_pct);

        let metrics = ScoreMetrics {
            short_term_price_increase_pct: momentum.value,
            volume_increase_pct: volume.value,
            order_book_imbalance: imbalance.value,
            trade_velocity: velocity.value,
            buy_pressure_pct: pressure.value,
        };

        let readings = [momentum, volume, imbalance, velocity, pressure];
        let composite_score: f64 = readings.iter().map(|r| r.points).sum();
        let signals: Vec<String> = readings
            .into_iter()
            .filter_map(|r| r.description)
            .collect();

        Ok(ScoreResult {
            symbol: input.symbol.to_string(),
            composite_score,
            signals,
            metrics,
            is_pump_candidate: composite_score > self.config.pump_score_threshold,
        })
    }
}
