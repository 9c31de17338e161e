//! Log sink setup.
//!
//! One JSON-formatted line per event on stdout, minimum level `info`.
//! `RUST_LOG` overrides the filter for local debugging.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Call once, first thing in `main`, before any code that logs.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
