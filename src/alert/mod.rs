//! Alert module
//!
//! Pump events, notification channels and the dispatcher that fans alerts
//! out to both.

mod dispatcher;
mod notifier;
mod types;

pub use dispatcher::AlertDispatcher;
pub use notifier::{ChannelNotifier, LogNotifier, Notifier};
pub use types::{NotifyError, PumpAlert};

use crate::config::{AlertConfig, NotifierKind};
use std::sync::Arc;

/// Build the notifier selected in configuration
pub fn notifier_from_config(config: &AlertConfig) -> Option<Arc<dyn Notifier>> {
    match config.notifier {
        NotifierKind::Log => Some(Arc::new(LogNotifier)),
        NotifierKind::None => None,
    }
}
