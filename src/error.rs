//! Unified error type.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// The error type returned by howdy's fallible operations.
///
/// Request-level failures never appear here; a panicking handler is
/// absorbed by [`CatchPanic`](crate::middleware::CatchPanic) and becomes a
/// 500 response. This type surfaces the two faults the process cannot
/// survive: failing to acquire the listen port, and failing to drain
/// in-flight connections before the shutdown deadline.
#[derive(Debug)]
pub enum Error {
    /// The listener could not bind its address. Not retried.
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    /// In-flight connections did not drain within the grace period.
    /// Remaining connections were force-terminated.
    DrainTimeout { grace: Duration },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::DrainTimeout { grace } => write!(
                f,
                "shutdown deadline of {}s exceeded, aborting remaining connections",
                grace.as_secs()
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } => Some(source),
            Self::DrainTimeout { .. } => None,
        }
    }
}
