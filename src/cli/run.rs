//! Run command implementation

use super::market_source;
use crate::alert::notifier_from_config;
use crate::config::Config;
use crate::scanner::PumpScanner;
use clap::Args;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the scan interval (milliseconds)
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Seconds between status log lines (0 disables)
    #[arg(long, default_value_t = 60)]
    pub status_every_secs: u64,
}

impl RunArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(interval_ms) = self.interval_ms {
            config.scanner.scan_interval_ms = interval_ms;
        }
        config.validate()?;

        let source = market_source(&config)?;
        let notifier = notifier_from_config(&config.alert);
        let scanner = PumpScanner::new(config, source, notifier);

        let mut events = scanner.subscribe();
        scanner.start().await;

        let mut status_tick = (self.status_every_secs > 0)
            .then(|| tokio::time::interval(Duration::from_secs(self.status_every_secs)));

        loop {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Failed to listen for shutdown signal");
                    }
                    break;
                }
                event = events.recv() => match event {
                    Ok(alert) => tracing::debug!(
                        alert_id = %alert.id,
                        symbol = %alert.symbol,
                        "Pump event published"
                    ),
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Pump event subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = async {
                    match status_tick.as_mut() {
                        Some(tick) => { tick.tick().await; }
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    let status = scanner.status().await;
                    tracing::info!(
                        tracked = status.tracked_symbol_count,
                        scans = status.scans_completed,
                        cooling_down = status.recently_alerted_symbols.len(),
                        "Scanner status"
                    );
                }
            }
        }

        tracing::info!("Shutting down");
        scanner.stop().await;
        Ok(())
    }
}
