//! Scan scheduler
//!
//! Drives repeated evaluation of the whole symbol universe:
//! 1. Refresh the tradable universe when it is stale
//! 2. Fetch 24h tickers and apply the liquidity filter
//! 3. For each liquid symbol (bounded concurrency): record history, fetch the
//!    order book and recent trades, score, and alert through the cooldown gate
//!
//! Fetch failures only ever cost the affected symbol(s) one cycle.

use super::types::{ScanReport, ScannerStatus, SymbolOutcome};
use super::universe::Universe;
use crate::alert::{AlertDispatcher, Notifier, PumpAlert};
use crate::config::{window_duration, Config};
use crate::cooldown::CooldownTracker;
use crate::feed::{MarketDataSource, MarketSnapshot, Ticker};
use crate::history::HistoryStore;
use crate::scoring::{ScoreInput, ScoringConfig, ScoringEngine};
use crate::telemetry::{
    increment_counter, record_fetch_error, record_latency, set_gauge, CounterMetric, FetchKind,
    GaugeMetric, LatencyMetric,
};
use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Per-symbol evaluation result plus the fetch failures it hit
struct SymbolEvaluation {
    outcome: SymbolOutcome,
    fetch_failures: usize,
}

/// State shared by the timer loop and every scan task
struct ScanContext {
    config: Config,
    source: Arc<dyn MarketDataSource>,
    history: HistoryStore,
    cooldown: CooldownTracker,
    scorer: ScoringEngine,
    alerts: AlertDispatcher,
    universe: RwLock<Universe>,
    tracked_symbols: AtomicUsize,
    scans_completed: AtomicU64,
    last_scan_at: RwLock<Option<DateTime<Utc>>>,
    scans_in_flight: AtomicUsize,
}

/// Counts one spawned scan as in flight until dropped, even by panic
struct InFlightGuard(Arc<ScanContext>);

impl InFlightGuard {
    fn enter(ctx: Arc<ScanContext>) -> Self {
        ctx.scans_in_flight.fetch_add(1, Ordering::AcqRel);
        Self(ctx)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.scans_in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

impl ScanContext {
    async fn run_scan(&self) -> ScanReport {
        let started = Instant::now();
        let observed_at = Utc::now();
        let mut report = ScanReport::default();

        self.refresh_universe_if_stale(observed_at).await;

        let tickers = match self.source.fetch_tickers().await {
            Ok(tickers) => tickers,
            Err(e) => {
                tracing::warn!(error = %e, "Ticker fetch failed, skipping scan");
                record_fetch_error(FetchKind::Tickers);
                report.fetch_failures += 1;
                report.duration = started.elapsed();
                return report;
            }
        };

        let liquid = {
            let universe = self.universe.read().await;
            universe.filter_liquid(tickers, self.config.scanner.min_quote_volume)
        };
        report.evaluated = liquid.len();
        self.tracked_symbols.store(liquid.len(), Ordering::Relaxed);
        set_gauge(GaugeMetric::TrackedSymbols, liquid.len() as f64);

        let evaluations: Vec<SymbolEvaluation> = stream::iter(liquid)
            .map(|ticker| self.evaluate_symbol(ticker, observed_at))
            .buffer_unordered(self.config.scanner.max_concurrency.max(1))
            .collect()
            .await;

        for evaluation in evaluations {
            report.fetch_failures += evaluation.fetch_failures;
            match evaluation.outcome {
                SymbolOutcome::Insufficient => report.insufficient += 1,
                SymbolOutcome::Scored { result, alerted } => {
                    if result.is_pump_candidate {
                        report.candidates += 1;
                    }
                    if alerted {
                        report.alerts += 1;
                    }
                    report.scores.push(result);
                }
            }
        }

        report.duration = started.elapsed();
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        *self.last_scan_at.write().await = Some(observed_at);
        increment_counter(CounterMetric::ScansCompleted);
        record_latency(LatencyMetric::Scan, report.duration);
        set_gauge(GaugeMetric::HistoryEntries, self.history.len() as f64);

        if report.candidates == 0 {
            tracing::debug!(
                evaluated = report.evaluated,
                scored = report.scored(),
                insufficient = report.insufficient,
                fetch_failures = report.fetch_failures,
                duration_ms = report.duration.as_millis() as u64,
                "Scan complete, no candidates"
            );
        } else {
            tracing::info!(
                evaluated = report.evaluated,
                candidates = report.candidates,
                alerts = report.alerts,
                fetch_failures = report.fetch_failures,
                duration_ms = report.duration.as_millis() as u64,
                "Scan complete"
            );
        }

        report
    }

    async fn refresh_universe_if_stale(&self, now: DateTime<Utc>) {
        let max_age = window_duration(self.config.scanner.universe_refresh_secs);
        if self.universe.read().await.is_stale(now, max_age) {
            self.refresh_universe(now).await;
        }
    }

    async fn refresh_universe(&self, now: DateTime<Utc>) {
        let started = Instant::now();
        let listing = match self.source.fetch_universe().await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(error = %e, "Universe refresh failed, reusing previous universe");
                record_fetch_error(FetchKind::Universe);
                return;
            }
        };

        let universe = Universe::from_listing(&listing, &self.config.feed.quote_asset, now);
        if universe.is_empty() {
            tracing::warn!(
                listed = listing.len(),
                quote_asset = %self.config.feed.quote_asset,
                "Universe refresh returned no tradable symbols, keeping previous universe"
            );
            return;
        }

        let reaped = self.history.retain_symbols(universe.symbols());
        let expired = self.cooldown.sweep(now);
        record_latency(LatencyMetric::UniverseRefresh, started.elapsed());
        set_gauge(GaugeMetric::UniverseSize, universe.len() as f64);
        tracing::info!(
            symbols = universe.len(),
            listed = listing.len(),
            reaped_histories = reaped,
            expired_cooldowns = expired,
            "Symbol universe refreshed"
        );

        *self.universe.write().await = universe;
    }

    async fn evaluate_symbol(
        &self,
        ticker: Ticker,
        observed_at: DateTime<Utc>,
    ) -> SymbolEvaluation {
        let mut snapshot = MarketSnapshot {
            ticker,
            order_book: None,
            recent_trades: None,
        };
        let symbol = snapshot.ticker.symbol.as_str();
        let history = self.history.record_and_snapshot(
            symbol,
            snapshot.ticker.last_price,
            snapshot.ticker.volume,
            observed_at,
        );

        // Without enough history there is nothing to score, so spare the
        // per-symbol requests.
        let required = self.scorer.config().min_samples;
        if history.prices.len() < required || history.volumes.len() < required {
            increment_counter(CounterMetric::InsufficientData);
            tracing::trace!(
                symbol,
                samples = history.prices.len(),
                required,
                "Insufficient history"
            );
            return SymbolEvaluation {
                outcome: SymbolOutcome::Insufficient,
                fetch_failures: 0,
            };
        }

        let feed = &self.config.feed;
        let (book, trades) = tokio::join!(
            self.source.fetch_order_book(symbol, feed.order_book_depth),
            self.source.fetch_recent_trades(symbol, feed.recent_trades_limit),
        );

        let mut fetch_failures = 0;
        snapshot.order_book = book.unwrap_or_else(|e| {
            tracing::warn!(symbol, error = %e, "Order book fetch failed");
            record_fetch_error(FetchKind::OrderBook);
            fetch_failures += 1;
            None
        });
        snapshot.recent_trades = trades.unwrap_or_else(|e| {
            tracing::warn!(symbol, error = %e, "Trade fetch failed");
            record_fetch_error(FetchKind::Trades);
            fetch_failures += 1;
            None
        });

        let now = Utc::now();
        let result = match self.scorer.score(ScoreInput {
            symbol,
            prices: &history.prices,
            volumes: &history.volumes,
            order_book: snapshot.order_book.as_ref(),
            trades: snapshot.recent_trades.as_deref(),
            now,
        }) {
            Ok(result) => result,
            Err(e) => {
                increment_counter(CounterMetric::InsufficientData);
                tracing::trace!(symbol, reason = %e, "Skipping symbol");
                return SymbolEvaluation {
                    outcome: SymbolOutcome::Insufficient,
                    fetch_failures,
                };
            }
        };
        increment_counter(CounterMetric::SymbolsScored);

        let mut alerted = false;
        if result.is_pump_candidate {
            if self.cooldown.try_claim(symbol, now) {
                let alert = PumpAlert::new(&snapshot.ticker, result.clone(), now);
                self.alerts.dispatch(alert).await;
                alerted = true;
            } else {
                increment_counter(CounterMetric::AlertsSuppressed);
                tracing::debug!(
                    symbol,
                    score = result.composite_score,
                    "Candidate suppressed by cooldown"
                );
            }
        }

        SymbolEvaluation {
            outcome: SymbolOutcome::Scored { result, alerted },
            fetch_failures,
        }
    }
}

/// Handle to the running timer loop
struct RunHandle {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Periodic pump scanner
///
/// `Idle -> Running -> Idle`. Starting while running is a no-op. Stopping
/// cancels the timer only; scans already in flight run to completion and may
/// still alert.
pub struct PumpScanner {
    ctx: Arc<ScanContext>,
    run: Mutex<Option<RunHandle>>,
}

impl PumpScanner {
    /// Create a scanner over `source`, delivering alerts to `notifier`
    ///
    /// With no notifier, alerts are logged and broadcast to subscribers only.
    pub fn new(
        config: Config,
        source: Arc<dyn MarketDataSource>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let history = HistoryStore::with_retention_secs(config.detection.retention_window_secs);
        let cooldown = CooldownTracker::with_window_secs(config.alert.cooldown_secs);
        let scorer = ScoringEngine::new(ScoringConfig::from(&config.detection));
        let universe = Universe::empty(config.feed.quote_asset.clone());

        let ctx = ScanContext {
            config,
            source,
            history,
            cooldown,
            scorer,
            alerts: AlertDispatcher::new(notifier),
            universe: RwLock::new(universe),
            tracked_symbols: AtomicUsize::new(0),
            scans_completed: AtomicU64::new(0),
            last_scan_at: RwLock::new(None),
            scans_in_flight: AtomicUsize::new(0),
        };

        Self {
            ctx: Arc::new(ctx),
            run: Mutex::new(None),
        }
    }

    /// Subscribe to pump events
    pub fn subscribe(&self) -> broadcast::Receiver<PumpAlert> {
        self.ctx.alerts.subscribe()
    }

    /// Start periodic scanning
    ///
    /// Entering the running state refreshes the symbol universe, then runs
    /// one scan immediately even if a scan from a previous run is still
    /// draining. Returns `false` if the scanner was already running.
    pub async fn start(&self) -> bool {
        let mut run = self.run.lock().await;
        if let Some(handle) = run.as_ref() {
            if !handle.task.is_finished() {
                tracing::debug!("Scanner already running");
                return false;
            }
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let ctx = Arc::clone(&self.ctx);
        let task = tokio::spawn(run_timer_loop(ctx, stop_rx));
        *run = Some(RunHandle { stop_tx, task });

        tracing::info!(
            interval_ms = self.ctx.config.scanner.scan_interval_ms,
            max_concurrency = self.ctx.config.scanner.max_concurrency,
            "Scanner started"
        );
        true
    }

    /// Stop periodic scanning
    ///
    /// Returns `false` if the scanner was not running.
    pub async fn stop(&self) -> bool {
        let Some(handle) = self.run.lock().await.take() else {
            return false;
        };

        // The loop may already have exited; nothing to signal then
        let _ = handle.stop_tx.send(());
        if let Err(e) = handle.task.await {
            tracing::error!(error = %e, "Scanner loop terminated abnormally");
        }

        tracing::info!("Scanner stopped");
        true
    }

    pub async fn is_running(&self) -> bool {
        self.run
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.task.is_finished())
    }

    /// Run a single scan now, independent of the timer
    pub async fn scan_once(&self) -> ScanReport {
        self.ctx.run_scan().await
    }

    /// Current scanner status
    pub async fn status(&self) -> ScannerStatus {
        ScannerStatus {
            is_running: self.is_running().await,
            tracked_symbol_count: self.ctx.tracked_symbols.load(Ordering::Relaxed),
            recently_alerted_symbols: self.ctx.cooldown.active_symbols(Utc::now()),
            scans_completed: self.ctx.scans_completed.load(Ordering::Relaxed),
            last_scan_at: *self.ctx.last_scan_at.read().await,
        }
    }

    /// Symbols currently holding history
    pub fn history_len(&self) -> usize {
        self.ctx.history.len()
    }
}

impl Drop for PumpScanner {
    fn drop(&mut self) {
        if let Some(handle) = self.run.get_mut().take() {
            handle.task.abort();
        }
    }
}

async fn run_timer_loop(ctx: Arc<ScanContext>, mut stop_rx: oneshot::Receiver<()>) {
    tokio::select! {
        _ = &mut stop_rx => return,
        _ = ctx.refresh_universe(Utc::now()) => {}
    }
    spawn_scan(&ctx, true);

    let period = Duration::from_millis(ctx.config.scanner.scan_interval_ms.max(1));
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            _ = interval.tick() => spawn_scan(&ctx, false),
        }
    }
}

/// Spawn one scan; `first` marks the scan that opens a run
fn spawn_scan(ctx: &Arc<ScanContext>, first: bool) {
    let skip_overlap = ctx.config.scanner.skip_overlapping_scans;
    if skip_overlap && !first && ctx.scans_in_flight.load(Ordering::Acquire) > 0 {
        increment_counter(CounterMetric::ScansSkipped);
        tracing::debug!("Previous scan still running, skipping tick");
        return;
    }

    let guard = InFlightGuard::enter(Arc::clone(ctx));
    tokio::spawn(async move {
        guard.0.run_scan().await;
    });
}
