//! Tracing bootstrap for binaries and integration harnesses.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global JSON subscriber, filtered by `RUST_LOG`.
///
/// Safe to call more than once; a subscriber installed earlier (for example
/// by a test harness) wins and the duplicate attempt is logged through it.
pub fn init_logging() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
