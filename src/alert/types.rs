//! Alert types

use crate::feed::Ticker;
use crate::scoring::ScoreResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A detected pump, handed to notifiers and event subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PumpAlert {
    pub id: Uuid,
    pub symbol: String,
    /// Last traded price when detected
    pub price: f64,
    /// 24h price change reported by the exchange (%)
    pub price_change_pct_24h: f64,
    /// 24h volume in quote asset
    pub quote_volume_24h: f64,
    pub score: ScoreResult,
    pub detected_at: DateTime<Utc>,
}

impl PumpAlert {
    /// Build an alert from the scan's ticker and score
    pub fn new(ticker: &Ticker, score: ScoreResult, detected_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: ticker.symbol.clone(),
            price: ticker.last_price,
            price_change_pct_24h: ticker.price_change_percent,
            quote_volume_24h: ticker.quote_volume,
            score,
            detected_at,
        }
    }
}

/// Notification delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No notification channel is configured
    #[error("Notifier not configured")]
    NotConfigured,
    /// The channel rejected or failed to deliver the alert
    #[error("Delivery failed: {0}")]
    Delivery(String),
}
