//! Prometheus metrics

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Wall time of one full scan
    Scan,
    /// Symbol universe refresh
    UniverseRefresh,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Completed scans
    ScansCompleted,
    /// Ticks skipped because a scan was still running
    ScansSkipped,
    /// Symbols that produced a score
    SymbolsScored,
    /// Symbols skipped for lack of history
    InsufficientData,
    /// Alerts emitted
    AlertsEmitted,
    /// Candidates suppressed by the cooldown
    AlertsSuppressed,
    /// Notifier delivery failures
    NotifyFailures,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Symbols passing the liquidity filter in the last scan
    TrackedSymbols,
    /// Tradable symbols in the current universe
    UniverseSize,
    /// Symbols with retained history
    HistoryEntries,
}

/// Upstream call that failed
#[derive(Debug, Clone, Copy)]
pub enum FetchKind {
    Universe,
    Tickers,
    OrderBook,
    Trades,
}

impl FetchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchKind::Universe => "universe",
            FetchKind::Tickers => "tickers",
            FetchKind::OrderBook => "order_book",
            FetchKind::Trades => "trades",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::Scan => "pump_radar_scan_duration_ms",
        LatencyMetric::UniverseRefresh => "pump_radar_universe_refresh_ms",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
}

/// Increment a counter by one
pub fn increment_counter(metric: CounterMetric) {
    let metric_name = match metric {
        CounterMetric::ScansCompleted => "pump_radar_scans_total",
        CounterMetric::ScansSkipped => "pump_radar_scans_skipped_total",
        CounterMetric::SymbolsScored => "pump_radar_symbols_scored_total",
        CounterMetric::InsufficientData => "pump_radar_insufficient_data_total",
        CounterMetric::AlertsEmitted => "pump_radar_alerts_total",
        CounterMetric::AlertsSuppressed => "pump_radar_suppressed_alerts_total",
        CounterMetric::NotifyFailures => "pump_radar_notify_failures_total",
    };

    metrics::counter!(metric_name).increment(1);
}

/// Count a failed upstream fetch
pub fn record_fetch_error(kind: FetchKind) {
    metrics::counter!("pump_radar_fetch_errors_total", "kind" => kind.as_str()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::TrackedSymbols => "pump_radar_tracked_symbols",
        GaugeMetric::UniverseSize => "pump_radar_universe_size",
        GaugeMetric::HistoryEntries => "pump_radar_history_entries",
    };

    metrics::gauge!(metric_name).set(value);
}
