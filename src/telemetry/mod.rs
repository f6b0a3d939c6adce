//! Telemetry module
//!
//! Logging and Prometheus metrics

mod logging;
mod metrics;

pub use crate::config::LogFormat;
pub use self::logging::init_logging;
pub use self::metrics::{
    increment_counter, record_fetch_error, record_latency, set_gauge, CounterMetric, FetchKind,
    GaugeMetric, LatencyMetric,
};

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize all telemetry subsystems
///
/// Must run inside a Tokio runtime when a metrics port is configured.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        PrometheusBuilder::new().with_http_listener(addr).install()?;
        tracing::info!(%addr, "Prometheus exporter listening");
    }

    Ok(())
}
