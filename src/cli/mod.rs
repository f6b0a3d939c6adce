//! CLI interface for pump-radar
//!
//! Provides subcommands for:
//! - `run`: Scan continuously and alert on pumps
//! - `scan`: Run a fixed number of scans and print the top scores
//! - `config`: Show the effective configuration

mod run;
mod scan;

pub use run::RunArgs;
pub use scan::ScanArgs;

use crate::config::Config;
use crate::feed::{BinanceClient, BinanceConfig, MarketDataSource};
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pump-radar")]
#[command(about = "Scans exchange symbols for coordinated price/volume pumps")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan continuously until interrupted
    Run(RunArgs),
    /// Run a fixed number of scans and print the top scores
    Scan(ScanArgs),
    /// Show the effective configuration
    Config,
}

/// Build the exchange client described by the feed configuration
fn market_source(config: &Config) -> anyhow::Result<Arc<dyn MarketDataSource>> {
    let client = BinanceClient::with_config(BinanceConfig::from(&config.feed))?;
    Ok(Arc::new(client))
}
