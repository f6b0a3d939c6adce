//! Configuration types for pump-radar

use serde::{Deserialize, Serialize};

/// Root configuration structure
///
/// Every section falls back to its defaults, so an empty file is valid.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub scanner: ScannerConfig,
    pub detection: DetectionConfig,
    pub alert: AlertConfig,
    pub telemetry: TelemetryConfig,
}

/// Market data feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    /// REST base URL of the exchange
    pub base_url: String,
    /// Only pairs quoted in this asset are scanned
    pub quote_asset: String,
    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Order book levels requested per symbol
    pub order_book_depth: usize,
    /// Recent trades requested per symbol
    pub recent_trades_limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            quote_asset: "USDT".to_string(),
            request_timeout_secs: 10,
            order_book_depth: 20,
            recent_trades_limit: 100,
        }
    }
}

/// Scan scheduling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Interval between scans (milliseconds)
    pub scan_interval_ms: u64,
    /// Minimum 24h quote volume for a symbol to be scanned
    pub min_quote_volume: f64,
    /// Maximum symbols evaluated concurrently within one scan
    pub max_concurrency: usize,
    /// Maximum age of the symbol universe before it is re-fetched (seconds)
    pub universe_refresh_secs: u64,
    /// Skip a tick while the previous scan is still running
    pub skip_overlapping_scans: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: 5_000,
            min_quote_volume: 100_000.0,
            max_concurrency: 32,
            universe_refresh_secs: 300,
            skip_overlapping_scans: true,
        }
    }
}

/// Scoring thresholds and history retention
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Maximum age of a history sample (seconds)
    pub retention_window_secs: u64,
    /// Samples required in both price and volume history before scoring
    pub min_samples: usize,
    /// Short-term price increase (%) needed for the momentum signal
    pub min_price_increase_pct: f64,
    /// Volume increase (%) needed for the volume spike signal
    pub min_volume_increase_pct: f64,
    /// Bid/ask notional ratio needed for the imbalance signal
    pub imbalance_threshold: f64,
    /// Trade count ratio (last minute vs previous) needed for the velocity signal
    pub velocity_threshold: f64,
    /// Share of aggressive buy notional (%) needed for the buy pressure signal
    pub min_buy_pressure_pct: f64,
    /// Composite score a symbol must exceed to be a pump candidate
    pub pump_score_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            retention_window_secs: 300,
            min_samples: 10,
            min_price_increase_pct: 2.0,
            min_volume_increase_pct: 150.0,
            imbalance_threshold: 1.5,
            velocity_threshold: 2.5,
            min_buy_pressure_pct: 60.0,
            pump_score_threshold: 50.0,
        }
    }
}

/// Alert delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum time between two alerts for the same symbol (seconds)
    pub cooldown_secs: u64,
    /// Notification channel
    pub notifier: NotifierKind,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 900,
            notifier: NotifierKind::Log,
        }
    }
}

/// Notification channel selection
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Alerts are written to the log
    #[default]
    Log,
    /// No notifier configured; alerts are only broadcast to subscribers
    None,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Prometheus exporter port; disabled when unset
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Longest retention, cooldown or universe refresh window accepted (10 years)
pub const MAX_WINDOW_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Convert a window in seconds to a chrono duration, saturating at
/// [`MAX_WINDOW_SECS`]
pub(crate) fn window_duration(secs: u64) -> chrono::Duration {
    chrono::Duration::seconds(secs.min(MAX_WINDOW_SECS) as i64)
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scanner cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scanner.scan_interval_ms == 0 {
            anyhow::bail!("scanner.scan_interval_ms must be greater than zero");
        }
        if self.scanner.max_concurrency == 0 {
            anyhow::bail!("scanner.max_concurrency must be greater than zero");
        }
        if self.detection.retention_window_secs == 0 {
            anyhow::bail!("detection.retention_window_secs must be greater than zero");
        }
        // Momentum and volume windows both read the last 10 samples
        if self.detection.min_samples < 10 {
            anyhow::bail!(
                "detection.min_samples must be at least 10, got {}",
                self.detection.min_samples
            );
        }
        if self.feed.quote_asset.is_empty() {
            anyhow::bail!("feed.quote_asset must not be empty");
        }
        let windows = [
            ("detection.retention_window_secs", self.detection.retention_window_secs),
            ("alert.cooldown_secs", self.alert.cooldown_secs),
            ("scanner.universe_refresh_secs", self.scanner.universe_refresh_secs),
        ];
        for (key, secs) in windows {
            if secs > MAX_WINDOW_SECS {
                anyhow::bail!("{key} must be at most {MAX_WINDOW_SECS}, got {secs}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [feed]
            base_url = "https://api.example.com"
            quote_asset = "USDC"

            [scanner]
            scan_interval_ms = 2500
            min_quote_volume = 250000.0
            max_concurrency = 8

            [detection]
            retention_window_secs = 600
            imbalance_threshold = 2.0

            [alert]
            cooldown_secs = 60
            notifier = "none"

            [telemetry]
            log_level = "debug"
            log_format = "json"
            metrics_port = 9100
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.feed.quote_asset, "USDC");
        assert_eq!(config.scanner.scan_interval_ms, 2500);
        assert_eq!(config.scanner.max_concurrency, 8);
        assert_eq!(config.detection.retention_window_secs, 600);
        assert_eq!(config.detection.imbalance_threshold, 2.0);
        assert_eq!(config.alert.notifier, NotifierKind::None);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.telemetry.metrics_port, Some(9100));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let toml = r#"
            [detection]
            min_price_increase_pct = 3.5
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.detection.min_price_increase_pct, 3.5);
        assert_eq!(config.detection.min_volume_increase_pct, 150.0);
        assert_eq!(config.detection.pump_score_threshold, 50.0);
        assert_eq!(config.scanner.scan_interval_ms, 5_000);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.feed.quote_asset, "USDT");
        assert_eq!(config.scanner.min_quote_volume, 100_000.0);
        assert_eq!(config.detection.retention_window_secs, 300);
        assert_eq!(config.alert.cooldown_secs, 900);
        assert_eq!(config.alert.notifier, NotifierKind::Log);
        assert!(config.telemetry.metrics_port.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scanner]\nscan_interval_ms = 1000").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scanner.scan_interval_ms, 1000);
    }

    #[test]
    fn test_config_load_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scanner]\nmax_concurrency = 0").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_validate_min_samples() {
        let mut config = Config::default();
        config.detection.min_samples = 5;
        assert!(config.validate().is_err());

        config.detection.min_samples = 20;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_windows() {
        let mut config = Config::default();
        config.alert.cooldown_secs = u64::MAX / 2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.detection.retention_window_secs = MAX_WINDOW_SECS + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scanner.universe_refresh_secs = u64::MAX;
        assert!(config.validate().is_err());

        config.scanner.universe_refresh_secs = MAX_WINDOW_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_duration_saturates() {
        assert_eq!(window_duration(60), chrono::Duration::seconds(60));
        assert_eq!(
            window_duration(u64::MAX),
            chrono::Duration::seconds(MAX_WINDOW_SECS as i64)
        );
    }

    #[test]
    fn test_validate_zero_interval() {
        let mut config = Config::default();
        config.scanner.scan_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
