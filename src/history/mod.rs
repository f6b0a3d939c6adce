//! Price and volume history module
//!
//! Keeps a short sliding window of samples per symbol; the scoring engine
//! reads the tail of these windows.

mod store;
mod window;

pub use store::{HistorySnapshot, HistoryStore};
pub use window::{PriceSample, SymbolHistory, VolumeSample};
