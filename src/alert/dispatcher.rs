//! Alert fan-out to subscribers and the notification channel

use super::{Notifier, NotifyError, PumpAlert};
use crate::telemetry::{increment_counter, CounterMetric};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the pump event broadcast channel
const EVENT_CAPACITY: usize = 256;

/// Publishes detected pumps
///
/// Every alert is broadcast to subscribers, then handed to the notifier if
/// one is configured. Delivery problems are logged and never propagate.
pub struct AlertDispatcher {
    notifier: Option<Arc<dyn Notifier>>,
    events: broadcast::Sender<PumpAlert>,
    warned_unconfigured: AtomicBool,
}

impl AlertDispatcher {
    pub fn new(notifier: Option<Arc<dyn Notifier>>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            notifier,
            events,
            warned_unconfigured: AtomicBool::new(false),
        }
    }

    /// Subscribe to pump events
    pub fn subscribe(&self) -> broadcast::Receiver<PumpAlert> {
        self.events.subscribe()
    }

    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    /// Publish one alert
    pub async fn dispatch(&self, alert: PumpAlert) {
        increment_counter(CounterMetric::AlertsEmitted);

        if let Err(e) = self.deliver(&alert).await {
            match e {
                NotifyError::NotConfigured => {
                    if !self.warned_unconfigured.swap(true, Ordering::Relaxed) {
                        tracing::warn!("No notifier configured, alerts will only be logged");
                    }
                    tracing::info!(
                        symbol = %alert.symbol,
                        score = alert.score.composite_score,
                        signals = %alert.score.signals.join("; "),
                        "Pump detected (not delivered)"
                    );
                }
                NotifyError::Delivery(_) => {
                    increment_counter(CounterMetric::NotifyFailures);
                    tracing::error!(symbol = %alert.symbol, error = %e, "Failed to deliver alert");
                }
            }
        }

        // No subscribers is not an error
        let _ = self.events.send(alert);
    }

    async fn deliver(&self, alert: &PumpAlert) -> Result<(), NotifyError> {
        let notifier = self.notifier.as_ref().ok_or(NotifyError::NotConfigured)?;
        notifier.notify(alert).await
    }
}
