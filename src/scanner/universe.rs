//! Tradable symbol universe and liquidity filter

use crate::feed::{SymbolInfo, Ticker};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// The set of symbols eligible for scanning
#[derive(Debug, Clone, Default)]
pub struct Universe {
    quote_asset: String,
    symbols: HashSet<String>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Universe {
    /// An empty universe that has never been refreshed
    pub fn empty(quote_asset: impl Into<String>) -> Self {
        Self {
            quote_asset: quote_asset.into(),
            symbols: HashSet::new(),
            refreshed_at: None,
        }
    }

    /// Build from the exchange listing, keeping trading pairs in `quote_asset`
    pub fn from_listing(
        listing: &[SymbolInfo],
        quote_asset: impl Into<String>,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        let quote_asset = quote_asset.into();
        let symbols = listing
            .iter()
            .filter(|s| s.is_trading() && s.quote_asset.eq_ignore_ascii_case(&quote_asset))
            .map(|s| s.symbol.clone())
            .collect();

        Self {
            quote_asset,
            symbols,
            refreshed_at: Some(refreshed_at),
        }
    }

    /// Whether the universe should be re-fetched at `now`
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.refreshed_at {
            Some(at) => now - at >= max_age,
            None => true,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.is_some()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn symbols(&self) -> &HashSet<String> {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Keep tickers of universe symbols with enough 24h quote volume
    ///
    /// Before the first successful refresh, membership falls back to the
    /// symbol ending in the quote asset.
    pub fn filter_liquid(&self, tickers: Vec<Ticker>, min_quote_volume: f64) -> Vec<Ticker> {
        tickers
            .into_iter()
            .filter(|t| {
                if self.is_loaded() {
                    self.contains(&t.symbol)
                } else {
                    t.symbol.ends_with(&self.quote_asset)
                }
            })
            .filter(|t| t.quote_volume >= min_quote_volume && t.last_price > 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(symbol: &str, status: &str, quote: &str) -> SymbolInfo {
        SymbolInfo {
            symbol: symbol.to_string(),
            status: status.to_string(),
            quote_asset: quote.to_string(),
        }
    }

    fn ticker(symbol: &str, quote_volume: f64) -> Ticker {
        Ticker {
            symbol: symbol.to_string(),
            last_price: 1.0,
            volume: quote_volume,
            quote_volume,
            price_change_percent: 0.0,
        }
    }

    fn listing() -> Vec<SymbolInfo> {
        vec![
            info("BTCUSDT", "TRADING", "USDT"),
            info("ETHUSDT", "TRADING", "USDT"),
            info("ETHBTC", "TRADING", "BTC"),
            info("LUNAUSDT", "BREAK", "USDT"),
        ]
    }

    #[test]
    fn test_from_listing_filters_quote_and_status() {
        let universe = Universe::from_listing(&listing(), "USDT", Utc::now());

        assert_eq!(universe.len(), 2);
        assert!(universe.contains("BTCUSDT"));
        assert!(universe.contains("ETHUSDT"));
        assert!(!universe.contains("ETHBTC"));
        assert!(!universe.contains("LUNAUSDT"));
    }

    #[test]
    fn test_staleness() {
        let now = Utc::now();
        let max_age = Duration::seconds(300);

        assert!(Universe::empty("USDT").is_stale(now, max_age));

        let universe = Universe::from_listing(&listing(), "USDT", now);
        assert!(!universe.is_stale(now + Duration::seconds(299), max_age));
        assert!(universe.is_stale(now + Duration::seconds(300), max_age));
    }

    #[test]
    fn test_filter_liquid() {
        let universe = Universe::from_listing(&listing(), "USDT", Utc::now());
        let tickers = vec![
            ticker("BTCUSDT", 5_000_000.0),
            ticker("ETHUSDT", 50_000.0),
            ticker("ETHBTC", 9_000_000.0),
            ticker("LUNAUSDT", 9_000_000.0),
            ticker("NEWUSDT", 9_000_000.0),
        ];

        let liquid = universe.filter_liquid(tickers, 100_000.0);
        let symbols: Vec<&str> = liquid.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTCUSDT"]);
    }

    #[test]
    fn test_filter_liquid_boundary_and_zero_price() {
        let universe = Universe::from_listing(&listing(), "USDT", Utc::now());
        let mut zero_price = ticker("ETHUSDT", 1_000_000.0);
        zero_price.last_price = 0.0;

        let liquid =
            universe.filter_liquid(vec![ticker("BTCUSDT", 100_000.0), zero_price], 100_000.0);
        assert_eq!(liquid.len(), 1);
        assert_eq!(liquid[0].symbol, "BTCUSDT");
    }

    #[test]
    fn test_filter_before_first_refresh_uses_suffix() {
        let universe = Universe::empty("USDT");
        let tickers = vec![ticker("BTCUSDT", 1_000_000.0), ticker("ETHBTC", 1_000_000.0)];

        let liquid = universe.filter_liquid(tickers, 100_000.0);
        assert_eq!(liquid.len(), 1);
        assert_eq!(liquid[0].symbol, "BTCUSDT");
    }
}
