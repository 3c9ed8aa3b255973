//! Logging setup shared by unit and integration tests.
//!
//! Output goes through the test writer, so it is captured per test and only
//! shown for failures (or with `--nocapture`). The filter comes from
//! `RUST_LOG` and defaults to `sleepsort=debug`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the test subscriber. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sleepsort=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_thread_names(true)
            .try_init();
    });
}

/// Initializes logging and marks the start of a named test.
pub fn init_test(test_name: &str) {
    init_test_logging();
    tracing::info!(test = test_name, "test start");
}
