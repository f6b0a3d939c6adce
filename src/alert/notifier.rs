//! Alert notifiers

use super::{NotifyError, PumpAlert};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Trait for alert delivery channels
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert
    async fn notify(&self, alert: &PumpAlert) -> Result<(), NotifyError>;
}

/// Writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &PumpAlert) -> Result<(), NotifyError> {
        tracing::warn!(
            alert_id = %alert.id,
            symbol = %alert.symbol,
            price = alert.price,
            change_24h_pct = alert.price_change_pct_24h,
            quote_volume_24h = alert.quote_volume_24h,
            score = alert.score.composite_score,
            signals = %alert.score.signals.join("; "),
            "PUMP DETECTED"
        );
        Ok(())
    }
}

/// Forwards alerts into an mpsc channel
pub struct ChannelNotifier {
    tx: mpsc::Sender<PumpAlert>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<PumpAlert>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, alert: &PumpAlert) -> Result<(), NotifyError> {
        self.tx
            .send(alert.clone())
            .await
            .map_err(|_| NotifyError::Delivery("alert receiver dropped".to_string()))
    }
}
