//! Test utilities for ipub.
//!
//! Helpers for writing tests: one-shot logging initialization and on-disk
//! project fixtures wired to the in-memory store, so resolver behavior can
//! be asserted without an IPFS daemon.

pub mod fixtures;

pub use fixtures::ProjectFixture;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests.
static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for tests, once per process.
///
/// Respects `RUST_LOG` when set; silent otherwise so test output stays
/// readable.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_test_writer()
                .try_init();
        }
    });
}
