//! Rolling sample window for a single symbol

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One observation of last-trade price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: f64,
    pub observed_at: DateTime<Utc>,
}

/// One observation of rolling 24h volume as reported by the feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSample {
    pub volume: f64,
    pub observed_at: DateTime<Utc>,
}

/// Price and volume history for one symbol
///
/// Samples are kept in insertion order. After every [`record`](Self::record)
/// all retained samples satisfy `observed_at >= now - retention`.
#[derive(Debug, Clone, Default)]
pub struct SymbolHistory {
    prices: VecDeque<PriceSample>,
    volumes: VecDeque<VolumeSample>,
}

impl SymbolHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one price and one volume sample, then evict expired samples
    pub fn record(&mut self, price: f64, volume: f64, now: DateTime<Utc>, retention: Duration) {
        self.prices.push_back(PriceSample {
            price,
            observed_at: now,
        });
        self.volumes.push_back(VolumeSample {
            volume,
            observed_at: now,
        });

        self.evict(now - retention);
    }

    /// Drop all samples observed before `cutoff`
    pub fn evict(&mut self, cutoff: DateTime<Utc>) {
        while let Some(sample) = self.prices.front() {
            if sample.observed_at < cutoff {
                self.prices.pop_front();
            } else {
                break;
            }
        }
        while let Some(sample) = self.volumes.front() {
            if sample.observed_at < cutoff {
                self.volumes.pop_front();
            } else {
                break;
            }
        }
    }

    /// Price values observed at or after `cutoff`, oldest first
    pub fn prices_since(&self, cutoff: DateTime<Utc>) -> Vec<f64> {
        self.prices
            .iter()
            .filter(|s| s.observed_at >= cutoff)
            .map(|s| s.price)
            .collect()
    }

    /// Volume values observed at or after `cutoff`, oldest first
    pub fn volumes_since(&self, cutoff: DateTime<Utc>) -> Vec<f64> {
        self.volumes
            .iter()
            .filter(|s| s.observed_at >= cutoff)
            .map(|s| s.volume)
            .collect()
    }

    pub fn price_samples(&self) -> impl Iterator<Item = &PriceSample> {
        self.prices.iter()
    }

    pub fn volume_samples(&self) -> impl Iterator<Item = &VolumeSample> {
        self.volumes.iter()
    }

    /// Number of retained price samples
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.volumes.is_empty()
    }

    /// Timestamp of the most recent sample
    pub fn last_observed(&self) -> Option<DateTime<Utc>> {
        self.prices.back().map(|s| s.observed_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retention() -> Duration {
        Duration::seconds(300)
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = SymbolHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.last_observed().is_none());
    }

    #[test]
    fn test_record_appends_both_series() {
        let mut history = SymbolHistory::new();
        let now = Utc::now();

        history.record(100.0, 5000.0, now, retention());
        history.record(101.0, 5100.0, now + Duration::seconds(5), retention());

        let cutoff = now - retention();
        assert_eq!(history.prices_since(cutoff), vec![100.0, 101.0]);
        assert_eq!(history.volumes_since(cutoff), vec![5000.0, 5100.0]);
        assert_eq!(history.last_observed(), Some(now + Duration::seconds(5)));
    }

    #[test]
    fn test_record_evicts_expired_samples() {
        let mut history = SymbolHistory::new();
        let base = Utc::now();

        for i in 0..5 {
            history.record(100.0 + i as f64, 1.0, base + Duration::seconds(i), retention());
        }
        assert_eq!(history.len(), 5);

        // Samples at base+0 and base+1 fall out of the window
        history.record(200.0, 1.0, base + Duration::seconds(302), retention());

        let prices: Vec<f64> = history.price_samples().map(|s| s.price).collect();
        assert_eq!(prices, vec![102.0, 103.0, 104.0, 200.0]);
        assert_eq!(history.volume_samples().count(), 4);
    }

    #[test]
    fn test_sample_at_exact_cutoff_is_retained() {
        let mut history = SymbolHistory::new();
        let base = Utc::now();

        history.record(1.0, 1.0, base, retention());
        history.record(2.0, 1.0, base + retention(), retention());

        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_samples_stay_time_ordered() {
        let mut history = SymbolHistory::new();
        let base = Utc::now();

        for i in 0..50 {
            history.record(i as f64, i as f64, base + Duration::seconds(i * 10), retention());
        }

        let times: Vec<_> = history.price_samples().map(|s| s.observed_at).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert!(times
            .iter()
            .all(|t| *t >= base + Duration::seconds(490) - retention()));
    }
}
