//! pump-radar: Multi-factor pump detector for exchange spot symbols
//!
//! This library provides the core components for:
//! - REST market data from Binance (universe, tickers, depth, trades)
//! - Rolling per-symbol price/volume history
//! - Five-signal pump scoring with a composite threshold
//! - Per-symbol alert cooldowns
//! - Alert dispatch to notifiers and event subscribers
//! - A periodic scanner with bounded per-symbol concurrency
//! - Logging and Prometheus metrics

pub mod alert;
pub mod cli;
pub mod config;
pub mod cooldown;
pub mod feed;
pub mod history;
pub mod scanner;
pub mod scoring;
pub mod telemetry;
