//! Binance REST market data client
//!
//! Pulls the symbol listing, 24h tickers, order book depth and recent trades
//! from the public spot API. Numeric fields arrive as decimal strings.

use super::{MarketDataSource, OrderBook, PriceLevel, SymbolInfo, Ticker, Trade, TransportError};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Binance spot REST base URL
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Largest depth the depth endpoint accepts without rounding
const MAX_DEPTH: usize = 5000;

/// Largest page the trades endpoint returns
const MAX_TRADES: usize = 1000;

/// Configuration for the Binance client
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// Base URL for the REST API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: BINANCE_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&crate::config::FeedConfig> for BinanceConfig {
    fn from(config: &crate::config::FeedConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeInfoResponse {
    symbols: Vec<ExchangeSymbol>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeSymbol {
    symbol: String,
    status: String,
    quote_asset: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickerResponse {
    symbol: String,
    #[serde(deserialize_with = "de_f64_str")]
    last_price: f64,
    #[serde(deserialize_with = "de_f64_str")]
    volume: f64,
    #[serde(deserialize_with = "de_f64_str")]
    quote_volume: f64,
    #[serde(deserialize_with = "de_f64_str")]
    price_change_percent: f64,
}

#[derive(Debug, Deserialize)]
struct DepthResponse {
    bids: Vec<[String; 2]>,
    asks: Vec<[String; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TradeResponse {
    #[serde(deserialize_with = "de_f64_str")]
    price: f64,
    #[serde(deserialize_with = "de_f64_str")]
    qty: f64,
    /// Trade time (milliseconds)
    time: i64,
    is_buyer_maker: bool,
}

fn de_f64_str<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse::<f64>().map_err(serde::de::Error::custom)
}

/// Client for Binance's public REST market data endpoints
pub struct BinanceClient {
    config: BinanceConfig,
    client: Client,
}

impl BinanceClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(BinanceConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: BinanceConfig) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let url = self.url(path);
        tracing::trace!(url = %url, "Binance request");

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TransportError::Parse(format!("{path}: {e}")))
    }

    fn convert_levels(levels: Vec<[String; 2]>) -> Result<Vec<PriceLevel>, TransportError> {
        levels
            .into_iter()
            .map(|[price, qty]| {
                let price = price
                    .parse::<f64>()
                    .map_err(|e| TransportError::Parse(format!("level price: {e}")))?;
                let quantity = qty
                    .parse::<f64>()
                    .map_err(|e| TransportError::Parse(format!("level quantity: {e}")))?;
                Ok(PriceLevel::new(price, quantity))
            })
            .collect()
    }

    fn convert_trade(trade: TradeResponse) -> Result<Trade, TransportError> {
        let time = Utc
            .timestamp_millis_opt(trade.time)
            .single()
            .ok_or_else(|| TransportError::Parse(format!("trade time {}", trade.time)))?;
        Ok(Trade {
            price: trade.price,
            quantity: trade.qty,
            time,
            is_buyer_maker: trade.is_buyer_maker,
        })
    }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
    async fn fetch_universe(&self) -> Result<Vec<SymbolInfo>, TransportError> {
        let info: ExchangeInfoResponse = self.get_json("/api/v3/exchangeInfo", &[]).await?;

        let symbols: Vec<SymbolInfo> = info
            .symbols
            .into_iter()
            .map(|s| SymbolInfo {
                symbol: s.symbol,
                status: s.status,
                quote_asset: s.quote_asset,
            })
            .collect();

        tracing::debug!(symbol_count = symbols.len(), "Fetched exchange info");
        Ok(symbols)
    }

    async fn fetch_tickers(&self) -> Result<Vec<Ticker>, TransportError> {
        let tickers: Vec<TickerResponse> = self.get_json("/api/v3/ticker/24hr", &[]).await?;

        Ok(tickers
            .into_iter()
            .map(|t| Ticker {
                symbol: t.symbol,
                last_price: t.last_price,
                volume: t.volume,
                quote_volume: t.quote_volume,
                price_change_percent: t.price_change_percent,
            })
            .collect())
    }

    async fn fetch_order_book(
        &self,
        symbol: &str,
        depth: usize,
    ) -> Result<Option<OrderBook>, TransportError> {
        let query = [
            ("symbol", symbol.to_string()),
            ("limit", depth.clamp(1, MAX_DEPTH).to_string()),
        ];
        let depth: DepthResponse = self.get_json("/api/v3/depth", &query).await?;

        Ok(Some(OrderBook::new(
            Self::convert_levels(depth.bids)?,
            Self::convert_levels(depth.asks)?,
        )))
    }

    async fn fetch_recent_trades(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Option<Vec<Trade>>, TransportError> {
        let query = [
            ("symbol", symbol.to_string()),
            ("limit", limit.clamp(1, MAX_TRADES).to_string()),
        ];
        let trades: Vec<TradeResponse> = self.get_json("/api/v3/trades", &query).await?;

        let trades = trades
            .into_iter()
            .map(Self::convert_trade)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(trades))
    }
}
