//! Concurrent per-symbol history store

use super::SymbolHistory;
use crate::config::window_duration;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::HashSet;

/// In-window price and volume values for one symbol, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySnapshot {
    pub prices: Vec<f64>,
    pub volumes: Vec<f64>,
}

/// Sliding-window history for every scanned symbol
///
/// Entries are created lazily on first observation. Each update runs under the
/// map's shard lock for that key, so the append and prune of one symbol can
/// never interleave with another writer on the same symbol.
#[derive(Debug)]
pub struct HistoryStore {
    entries: DashMap<String, SymbolHistory>,
    retention: Duration,
}

impl HistoryStore {
    /// Create a store retaining samples for `retention`
    pub fn new(retention: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            retention,
        }
    }

    /// Create a store with the retention window in seconds
    pub fn with_retention_secs(secs: u64) -> Self {
        Self::new(window_duration(secs))
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Append a price and volume sample for `symbol`, then prune to the window
    pub fn record(&self, symbol: &str, price: f64, volume: f64, now: DateTime<Utc>) {
        let mut history = self.entries.entry(symbol.to_string()).or_default();
        history.record(price, volume, now, self.retention);
    }

    /// Samples of `symbol` still inside the retention window at `now`
    ///
    /// The returned vectors are copies; later writes do not affect them.
    pub fn snapshot(&self, symbol: &str, now: DateTime<Utc>) -> HistorySnapshot {
        let cutoff = now - self.retention;
        self.entries
            .get(symbol)
            .map(|history| HistorySnapshot {
                prices: history.prices_since(cutoff),
                volumes: history.volumes_since(cutoff),
            })
            .unwrap_or_default()
    }

    /// Record a sample and return the resulting snapshot in one step
    pub fn record_and_snapshot(
        &self,
        symbol: &str,
        price: f64,
        volume: f64,
        now: DateTime<Utc>,
    ) -> HistorySnapshot {
        let mut history = self.entries.entry(symbol.to_string()).or_default();
        history.record(price, volume, now, self.retention);
        let cutoff = now - self.retention;
        HistorySnapshot {
            prices: history.prices_since(cutoff),
            volumes: history.volumes_since(cutoff),
        }
    }

    /// Drop entries for symbols outside `active`; returns how many were removed
    pub fn retain_symbols(&self, active: &HashSet<String>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|symbol, _| active.contains(symbol));
        before.saturating_sub(self.entries.len())
    }

    /// Number of symbols with history
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }
}
