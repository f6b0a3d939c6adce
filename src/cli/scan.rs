//! Scan command implementation

use super::market_source;
use crate::alert::notifier_from_config;
use crate::config::Config;
use crate::scanner::{PumpScanner, ScanReport};
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Number of consecutive scans (scores need at least 10)
    #[arg(short, long, default_value_t = 12)]
    pub rounds: usize,

    /// How many of the highest scores to print
    #[arg(short, long, default_value_t = 10)]
    pub top: usize,
}

impl ScanArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        if self.rounds == 0 {
            anyhow::bail!("--rounds must be at least 1");
        }
        config.validate()?;

        let interval = Duration::from_millis(config.scanner.scan_interval_ms);
        let source = market_source(&config)?;
        let notifier = notifier_from_config(&config.alert);
        let scanner = PumpScanner::new(config, source, notifier);

        let mut last = ScanReport::default();
        for round in 1..=self.rounds {
            last = scanner.scan_once().await;
            tracing::info!(
                round,
                evaluated = last.evaluated,
                scored = last.scored(),
                candidates = last.candidates,
                "Scan round complete"
            );
            if round < self.rounds {
                tokio::time::sleep(interval).await;
            }
        }

        print_report(&last, self.top);
        Ok(())
    }
}

fn print_report(report: &ScanReport, top: usize) {
    println!(
        "Evaluated {} symbols: {} scored, {} awaiting history, {} candidates, {} alerts",
        report.evaluated,
        report.scored(),
        report.insufficient,
        report.candidates,
        report.alerts
    );

    if report.scores.is_empty() {
        println!("No scores yet; run more rounds to fill the history window");
        return;
    }

    println!(
        "{:<14} {:>7} {:>9} {:>9} {:>7} {:>7} {:>7}",
        "SYMBOL", "SCORE", "PRICE%", "VOL%", "BOOK", "VEL", "BUY%"
    );
    for score in report.top(top) {
        let m = &score.metrics;
        println!(
            "{:<14} {:>7.1} {:>9.2} {:>9.1} {:>7.2} {:>7.2} {:>7.1}{}",
            score.symbol,
            score.composite_score,
            m.short_term_price_increase_pct,
            m.volume_increase_pct,
            m.order_book_imbalance,
            m.trade_velocity,
            m.buy_pressure_pct,
            if score.is_pump_candidate { "  <- PUMP" } else { "" }
        );
    }
}
