//! Scanner status and scan report types

use crate::scoring::ScoreResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Snapshot of the scanner for the control surface
#[derive(Debug, Clone, Serialize)]
pub struct ScannerStatus {
    pub is_running: bool,
    /// Symbols that passed the liquidity filter in the last scan
    pub tracked_symbol_count: usize,
    /// Symbols currently inside their alert cooldown
    pub recently_alerted_symbols: Vec<String>,
    pub scans_completed: u64,
    pub last_scan_at: Option<DateTime<Utc>>,
}

/// Outcome of evaluating one symbol
#[derive(Debug, Clone)]
pub(crate) enum SymbolOutcome {
    /// Not enough history yet
    Insufficient,
    /// Scored; `alerted` is true when an alert was emitted
    Scored { result: ScoreResult, alerted: bool },
}

/// Summary of one scan
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Symbols that passed the liquidity filter
    pub evaluated: usize,
    /// Symbols skipped for lack of history
    pub insufficient: usize,
    /// Failed fetches (ticker batch, order books, trades)
    pub fetch_failures: usize,
    /// Every score produced, in completion order
    pub scores: Vec<ScoreResult>,
    /// Pump candidates found
    pub candidates: usize,
    /// Alerts emitted after the cooldown check
    pub alerts: usize,
    pub duration: Duration,
}

impl ScanReport {
    /// Number of symbols that produced a score
    pub fn scored(&self) -> usize {
        self.scores.len()
    }

    /// Scores sorted by composite score, highest first
    pub fn top(&self, n: usize) -> Vec<&ScoreResult> {
        let mut scores: Vec<&ScoreResult> = self.scores.iter().collect();
        scores.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
        scores.truncate(n);
        scores
    }
}
