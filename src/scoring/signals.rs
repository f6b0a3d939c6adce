//! Individual pump sub-signals
//!
//! Each function turns one raw input into a metric and the points it
//! contributes. Points are capped per signal so no single extreme reading can
//! carry the composite score on its own.

use crate::feed::{OrderBook, Trade};
use chrono::{DateTime, Duration, Utc};

/// Price samples read by the momentum signal
pub const MOMENTUM_WINDOW: usize = 10;
/// Of those, how many count as "recent"
pub const MOMENTUM_RECENT: usize = 5;
/// Volume samples read by the volume spike signal
pub const VOLUME_WINDOW: usize = 10;
/// Of those, how many count as "recent"
pub const VOLUME_RECENT: usize = 3;
/// Book levels summed per side
pub const BOOK_DEPTH: usize = 10;
/// Most recent trades considered for velocity and buy pressure
pub const TRADE_SAMPLE: usize = 100;

pub const MOMENTUM_CAP: f64 = 30.0;
pub const VOLUME_CAP: f64 = 25.0;
pub const IMBALANCE_CAP: f64 = 20.0;
pub const VELOCITY_CAP: f64 = 15.0;
pub const BUY_PRESSURE_CAP: f64 = 10.0;

/// Result of evaluating one sub-signal
#[derive(Debug, Clone, PartialEq)]
pub struct SignalReading {
    /// Raw metric value
    pub value: f64,
    /// Points contributed to the composite score (0 when not triggered)
    pub points: f64,
    /// Human-readable description, present only when triggered
    pub description: Option<String>,
}

impl SignalReading {
    fn quiet(value: f64) -> Self {
        Self {
            value,
            points: 0.0,
            description: None,
        }
    }

    fn triggered(value: f64, points: f64, description: String) -> Self {
        Self {
            value,
            points,
            description: Some(description),
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.description.is_some()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentage change of the recent tail mean over the preceding samples' mean
///
/// Reads the last `window` values; `recent` of them form the tail. Returns 0
/// when there are too few values or the baseline mean is zero.
fn tail_increase_pct(values: &[f64], window: usize, recent: usize) -> f64 {
    if values.len() < window || recent >= window {
        return 0.0;
    }
    let tail = &values[values.len() - window..];
    let (older, newer) = tail.split_at(window - recent);
    let baseline = mean(older);
    if baseline == 0.0 {
        return 0.0;
    }
    (mean(newer) - baseline) / baseline * 100.0
}

/// Short-term price momentum over the last 10 samples (5 recent vs 5 older)
pub fn price_momentum(prices: &[f64], min_increase_pct: f64) -> SignalReading {
    let pct = tail_increase_pct(prices, MOMENTUM_WINDOW, MOMENTUM_RECENT);
    if pct > min_increase_pct {
        let points = (pct * 5.0).min(MOMENTUM_CAP);
        SignalReading::triggered(pct, points, format!("Price up {pct:.2}% short-term"))
    } else {
        SignalReading::quiet(pct)
    }
}

/// Volume spike over the last 10 samples (3 recent vs 7 older)
pub fn volume_spike(volumes: &[f64], min_increase_pct: f64) -> SignalReading {
    let pct = tail_increase_pct(volumes, VOLUME_WINDOW, VOLUME_RECENT);
    if pct > min_increase_pct {
        let points = (pct / 10.0).min(VOLUME_CAP);
        SignalReading::triggered(pct, points, format!("Volume up {pct:.0}%"))
    } else {
        SignalReading::quiet(pct)
    }
}

/// Bid/ask notional ratio over the top 10 levels of each side
pub fn order_book_imbalance(book: Option<&OrderBook>, threshold: f64) -> SignalReading {
    let Some(book) = book else {
        return SignalReading::quiet(0.0);
    };

    let bid_volume = book.bid_notional(BOOK_DEPTH);
    let ask_volume = book.ask_notional(BOOK_DEPTH);
    let imbalance = if ask_volume > 0.0 {
        bid_volume / ask_volume
    } else {
        0.0
    };

    if imbalance > threshold {
        let points = ((imbalance - 1.0) * 10.0).min(IMBALANCE_CAP);
        SignalReading::triggered(
            imbalance,
            points,
            format!("Order book imbalance {imbalance:.2}x (bids/asks)"),
        )
    } else {
        SignalReading::quiet(imbalance)
    }
}

/// The most recent trades considered by the trade-based signals
fn trade_sample(trades: &[Trade]) -> &[Trade] {
    &trades[trades.len().saturating_sub(TRADE_SAMPLE)..]
}

/// Ratio of trades in the last minute to trades in the minute before
pub fn trade_velocity(
    trades: Option<&[Trade]>,
    now: DateTime<Utc>,
    threshold: f64,
) -> SignalReading {
    let trades = match trades {
        Some(trades) if trades.len() >= 2 => trade_sample(trades),
        _ => return SignalReading::quiet(0.0),
    };

    let one_minute = Duration::seconds(60);
    let two_minutes = Duration::seconds(120);

    let mut recent_count = 0usize;
    let mut older_count = 0usize;
    for trade in trades {
        let age = now - trade.time;
        if age < one_minute {
            recent_count += 1;
        } else if age < two_minutes {
            older_count += 1;
        }
    }

    let velocity = recent_count as f64 / older_count.max(1) as f64;
    if velocity > threshold {
        let points = ((velocity - 1.0) * 7.5).min(VELOCITY_CAP);
        SignalReading::triggered(
            velocity,
            points,
            format!("Trade velocity {velocity:.2}x ({recent_count} trades last minute)"),
        )
    } else {
        SignalReading::quiet(velocity)
    }
}

/// Share of trade notional initiated by aggressive buyers
pub fn buy_pressure(trades: Option<&[Trade]>, min_pressure_pct: f64) -> SignalReading {
    let Some(trades) = trades else {
        return SignalReading::quiet(0.0);
    };

    let (buy_volume, sell_volume) =
        trade_sample(trades)
            .iter()
            .fold((0.0, 0.0), |(buys, sells), trade| {
                if trade.is_buyer_maker {
                    (buys, sells + trade.notional())
                } else {
                    (buys + trade.notional(), sells)
                }
            });

    let total = buy_volume + sell_volume;
    let pct = if total > 0.0 {
        buy_volume / total * 100.0
    } else {
        0.0
    };

    if pct > min_pressure_pct {
        let points = ((pct - 50.0) / 5.0).min(BUY_PRESSURE_CAP);
        SignalReading::triggered(pct, points, format!("Buy pressure {pct:.1}%"))
    } else {
        SignalReading::quiet(pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::PriceLevel;

    fn trade(now: DateTime<Utc>, age_secs: i64, quantity: f64, is_buyer_maker: bool) -> Trade {
        Trade {
            price: 10.0,
            quantity,
            time: now - Duration::seconds(age_secs),
            is_buyer_maker,
        }
    }

    #[test]
    fn test_price_momentum_ten_percent() {
        let prices = [100.0, 100.0, 100.0, 100.0, 100.0, 110.0, 110.0, 110.0, 110.0, 110.0];
        let reading = price_momentum(&prices, 2.0);

        assert!((reading.value - 10.0).abs() < 1e-9);
        assert_eq!(reading.points, 30.0);
        assert!(reading.is_triggered());
    }

    #[test]
    fn test_price_momentum_uses_tail() {
        // Older samples beyond the last ten are ignored
        let mut prices = vec![1.0; 20];
        prices.extend([100.0; 5]);
        prices.extend([101.0; 5]);
        let reading = price_momentum(&prices, 2.0);

        assert!((reading.value - 1.0).abs() < 1e-9);
        assert_eq!(reading.points, 0.0);
        assert!(!reading.is_triggered());
    }

    #[test]
    fn test_price_momentum_below_cap() {
        let prices = [100.0, 100.0, 100.0, 100.0, 100.0, 103.0, 103.0, 103.0, 103.0, 103.0];
        let reading = price_momentum(&prices, 2.0);
        assert!((reading.points - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_momentum_falling_price() {
        let prices = [110.0, 110.0, 110.0, 110.0, 110.0, 100.0, 100.0, 100.0, 100.0, 100.0];
        let reading = price_momentum(&prices, 2.0);
        assert!(reading.value < 0.0);
        assert_eq!(reading.points, 0.0);
    }

    #[test]
    fn test_volume_spike() {
        let volumes = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 300.0, 300.0, 300.0];
        let reading = volume_spike(&volumes, 150.0);

        assert!((reading.value - 200.0).abs() < 1e-9);
        assert!((reading.points - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_spike_capped() {
        let volumes = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 50.0, 50.0, 50.0];
        let reading = volume_spike(&volumes, 150.0);
        assert_eq!(reading.points, VOLUME_CAP);
    }

    #[test]
    fn test_volume_spike_zero_baseline() {
        let volumes = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 50.0, 50.0, 50.0];
        let reading = volume_spike(&volumes, 150.0);
        assert_eq!(reading.value, 0.0);
        assert_eq!(reading.points, 0.0);
    }

    #[test]
    fn test_order_book_imbalance() {
        let book = OrderBook::new(
            vec![PriceLevel::new(10.0, 5.0)],
            vec![PriceLevel::new(10.0, 1.0)],
        );
        let reading = order_book_imbalance(Some(&book), 1.5);

        assert_eq!(reading.value, 5.0);
        assert_eq!(reading.points, 20.0);
    }

    #[test]
    fn test_order_book_imbalance_below_threshold() {
        let book = OrderBook::new(
            vec![PriceLevel::new(10.0, 1.2)],
            vec![PriceLevel::new(10.0, 1.0)],
        );
        let reading = order_book_imbalance(Some(&book), 1.5);
        assert!((reading.value - 1.2).abs() < 1e-9);
        assert_eq!(reading.points, 0.0);
    }

    #[test]
    fn test_order_book_imbalance_missing_or_empty() {
        assert_eq!(order_book_imbalance(None, 1.5).value, 0.0);

        let book = OrderBook::new(vec![PriceLevel::new(10.0, 5.0)], vec![]);
        let reading = order_book_imbalance(Some(&book), 1.5);
        assert_eq!(reading.value, 0.0);
        assert_eq!(reading.points, 0.0);
    }

    #[test]
    fn test_order_book_imbalance_only_top_ten_levels() {
        let mut bids = vec![PriceLevel::new(1.0, 1.0); 10];
        bids.push(PriceLevel::new(1.0, 1000.0));
        let asks = vec![PriceLevel::new(1.0, 1.0); 10];
        let book = OrderBook::new(bids, asks);

        let reading = order_book_imbalance(Some(&book), 1.5);
        assert_eq!(reading.value, 1.0);
    }

    #[test]
    fn test_trade_velocity() {
        let now = Utc::now();
        let mut trades: Vec<Trade> = (0..2).map(|_| trade(now, 90, 1.0, false)).collect();
        trades.extend((0..8).map(|_| trade(now, 10, 1.0, false)));

        let reading = trade_velocity(Some(&trades), now, 2.5);
        assert_eq!(reading.value, 4.0);
        assert_eq!(reading.points, 15.0);
    }

    #[test]
    fn test_trade_velocity_no_older_trades_floors_divisor() {
        let now = Utc::now();
        let trades: Vec<Trade> = (0..3).map(|_| trade(now, 5, 1.0, false)).collect();

        let reading = trade_velocity(Some(&trades), now, 2.5);
        assert_eq!(reading.value, 3.0);
        assert!((reading.points - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_trade_velocity_ignores_stale_trades() {
        let now = Utc::now();
        let trades: Vec<Trade> = (0..10).map(|_| trade(now, 600, 1.0, false)).collect();

        let reading = trade_velocity(Some(&trades), now, 2.5);
        assert_eq!(reading.value, 0.0);
    }

    #[test]
    fn test_trade_velocity_needs_two_trades() {
        let now = Utc::now();
        let trades = vec![trade(now, 1, 1.0, false)];

        assert_eq!(trade_velocity(Some(&trades), now, 2.5).value, 0.0);
        assert_eq!(trade_velocity(None, now, 2.5).value, 0.0);
    }

    #[test]
    fn test_trade_velocity_uses_last_hundred_trades() {
        let now = Utc::now();
        // 100 older-minute trades followed by 100 last-minute trades: only the
        // latter are sampled
        let mut trades: Vec<Trade> = (0..100).map(|_| trade(now, 90, 1.0, false)).collect();
        trades.extend((0..100).map(|_| trade(now, 5, 1.0, false)));

        let reading = trade_velocity(Some(&trades), now, 2.5);
        assert_eq!(reading.value, 100.0);
    }

    #[test]
    fn test_buy_pressure() {
        let now = Utc::now();
        let trades = vec![
            trade(now, 5, 8.0, false),
            trade(now, 5, 2.0, true),
        ];

        let reading = buy_pressure(Some(&trades), 60.0);
        assert!((reading.value - 80.0).abs() < 1e-9);
        assert!((reading.points - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_buy_pressure_capped() {
        let now = Utc::now();
        let trades = vec![trade(now, 5, 1.0, false)];

        let reading = buy_pressure(Some(&trades), 60.0);
        assert_eq!(reading.value, 100.0);
        assert_eq!(reading.points, BUY_PRESSURE_CAP);
    }

    #[test]
    fn test_buy_pressure_sell_dominated() {
        let now = Utc::now();
        let trades = vec![
            trade(now, 5, 1.0, false),
            trade(now, 5, 3.0, true),
        ];

        let reading = buy_pressure(Some(&trades), 60.0);
        assert!((reading.value - 25.0).abs() < 1e-9);
        assert_eq!(reading.points, 0.0);
    }

    #[test]
    fn test_buy_pressure_no_trades() {
        assert_eq!(buy_pressure(Some(&[]), 60.0).value, 0.0);
        assert_eq!(buy_pressure(None, 60.0).value, 0.0);
    }
}
