//! Market data feed module
//!
//! Defines the contract the scanner uses to pull tickers, order books and
//! trades, plus a REST implementation for Binance-compatible exchanges.

mod binance;
mod types;

pub use binance::{BinanceClient, BinanceConfig};
pub use types::{
    MarketSnapshot, OrderBook, PriceLevel, SymbolInfo, Ticker, Trade, TransportError,
};

use async_trait::async_trait;

/// Trait for market data sources
///
/// Every call may fail with a [`TransportError`]; the scanner treats a failure
/// as "no data this cycle" for whatever the call covered.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// List all symbols known to the exchange
    async fn fetch_universe(&self) -> Result<Vec<SymbolInfo>, TransportError>;

    /// Fetch 24h ticker statistics for every symbol
    async fn fetch_tickers(&self) -> Result<Vec<Ticker>, TransportError>;

    /// Fetch the top `depth` levels of a symbol's order book
    async fn fetch_order_book(
        &self,
        symbol: &str,
        depth: usize,
    ) -> Result<Option<OrderBook>, TransportError>;

    /// Fetch up to `limit` most recent trades, oldest first
    async fn fetch_recent_trades(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Option<Vec<Trade>>, TransportError>;
}
