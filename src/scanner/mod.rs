//! Scanner module
//!
//! Schedules scans over the liquid symbol universe and ties history, scoring,
//! cooldown and alerting together.

mod engine;
mod types;
mod universe;

pub use engine::PumpScanner;
pub use types::{ScanReport, ScannerStatus};
pub use universe::Universe;
