//! Per-symbol alert cooldown
//!
//! Suppresses repeat alerts for a symbol inside the cooldown window. Expired
//! entries are removed lazily when they are next looked at, or in bulk by
//! [`CooldownTracker::sweep`].

use chrono::{DateTime, Duration, Utc};
use crate::config::window_duration;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Tracks the last alert time of every recently alerted symbol
#[derive(Debug)]
pub struct CooldownTracker {
    window: Duration,
    last_alert: DashMap<String, DateTime<Utc>>,
}

impl CooldownTracker {
    /// Create a tracker with the given cooldown window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_alert: DashMap::new(),
        }
    }

    /// Create a tracker with the cooldown window in seconds
    pub fn with_window_secs(secs: u64) -> Self {
        Self::new(window_duration(secs))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// True iff `symbol` alerted less than one window before `now`
    ///
    /// An expired entry found here is deleted.
    pub fn should_suppress(&self, symbol: &str, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_alert.get(symbol).map(|entry| *entry) else {
            return false;
        };

        if now - last < self.window {
            return true;
        }

        // Only remove the entry we judged expired; a concurrent claim may have
        // replaced it in the meantime.
        self.last_alert
            .remove_if(symbol, |_, stamp| now - *stamp >= self.window);
        false
    }

    /// Record an alert for `symbol` at `now`, replacing any previous entry
    pub fn mark_alerted(&self, symbol: &str, now: DateTime<Utc>) {
        self.last_alert.insert(symbol.to_string(), now);
    }

    /// Atomically check the cooldown and mark the symbol as alerted
    ///
    /// Returns `true` when the caller may alert. Two concurrent claims for the
    /// same symbol can never both succeed.
    pub fn try_claim(&self, symbol: &str, now: DateTime<Utc>) -> bool {
        match self.last_alert.entry(symbol.to_string()) {
            Entry::Occupied(mut entry) => {
                if now - *entry.get() < self.window {
                    false
                } else {
                    entry.insert(now);
                    true
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    /// Symbols still inside their cooldown window at `now`
    pub fn active_symbols(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .last_alert
            .iter()
            .filter(|entry| now - *entry.value() < self.window)
            .map(|entry| entry.key().clone())
            .collect();
        symbols.sort();
        symbols
    }

    /// Remove every expired entry; returns how many were removed
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.last_alert.len();
        self.last_alert.retain(|_, last| now - *last < self.window);
        before.saturating_sub(self.last_alert.len())
    }

    /// Number of entries currently held, expired or not
    pub fn len(&self) -> usize {
        self.last_alert.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_alert.is_empty()
    }
}
