//! Log capture for test runs

use std::sync::Once;
use tracing_subscriber::{fmt::time::ChronoUtc, EnvFilter};

static INIT: Once = Once::new();

/// Install a fmt subscriber that writes through the test harness.
///
/// The filter comes from `RUST_LOG` and falls back to `warn`. Safe to call
/// from every test; only the first call does anything, and an already
/// installed global subscriber is left alone.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(ChronoUtc::rfc_3339())
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}
