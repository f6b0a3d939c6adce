//! Market data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upstream fetch failure (network, timeout, malformed response)
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Exchange answered with a non-success status
    #[error("Exchange returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    Parse(String),
}

/// One entry of the exchange's symbol listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolInfo {
    /// Trading pair (e.g., "BTCUSDT")
    pub symbol: String,
    /// Listing status (e.g., "TRADING", "BREAK")
    pub status: String,
    /// Denominating asset of the pair
    pub quote_asset: String,
}

impl SymbolInfo {
    /// Whether the pair is currently open for trading
    pub fn is_trading(&self) -> bool {
        self.status.eq_ignore_ascii_case("TRADING")
    }
}

/// 24h rolling ticker statistics for one symbol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticker {
    pub symbol: String,
    pub last_price: f64,
    /// 24h volume in base asset
    pub volume: f64,
    /// 24h volume in quote asset
    pub quote_volume: f64,
    pub price_change_percent: f64,
}

/// A price level in the order book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceLevel {
    pub price: f64,
    pub quantity: f64,
}

impl PriceLevel {
    pub fn new(price: f64, quantity: f64) -> Self {
        Self { price, quantity }
    }

    /// Quote-denominated value of the level
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }
}

/// Top-of-book snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderBook {
    /// Bid levels, best (highest) first
    pub bids: Vec<PriceLevel>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    pub fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { bids, asks }
    }

    /// Summed notional of the best `depth` bid levels
    pub fn bid_notional(&self, depth: usize) -> f64 {
        self.bids.iter().take(depth).map(PriceLevel::notional).sum()
    }

    /// Summed notional of the best `depth` ask levels
    pub fn ask_notional(&self, depth: usize) -> f64 {
        self.asks.iter().take(depth).map(PriceLevel::notional).sum()
    }
}

/// A single executed trade
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub price: f64,
    pub quantity: f64,
    pub time: DateTime<Utc>,
    /// True when the buyer was the resting order, i.e. the taker sold
    pub is_buyer_maker: bool,
}

impl Trade {
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }
}

/// Everything fetched for one symbol during one scan
///
/// `order_book` and `recent_trades` are `None` when the fetch failed or the
/// exchange had no data; the affected signals then contribute nothing.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub ticker: Ticker,
    pub order_book: Option<OrderBook>,
    pub recent_trades: Option<Vec<Trade>>,
}
