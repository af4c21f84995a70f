//! Subscriber installation
//!
//! Provides a single initialization point that routes `tracing` events into
//! an xlog logger.

use std::sync::Once;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use xlog::Logger;

use crate::layer::XlogLayer;

static INIT_ONCE: Once = Once::new();

/// Install a global subscriber that writes through `logger`
///
/// `RUST_LOG` overrides `default_filter` when set. Only the first call has
/// an effect; it returns `false` if another global subscriber was already
/// installed by someone else.
///
/// # Example
///
/// ```no_run
/// let logger = xlog::Logger::init("./logs", "info", []).unwrap();
/// xlog_tracing::init(logger, "info");
/// tracing::info!(user = "ann", "logged in");
/// ```
pub fn init(logger: Logger, default_filter: &str) -> bool {
    let mut installed = false;
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        installed = tracing_subscriber::registry()
            .with(filter)
            .with(XlogLayer::new(logger))
            .try_init()
            .is_ok();
    });
    installed
}
