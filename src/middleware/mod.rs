//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns. howdy ships two stages, registered outermost
//! first:
//!
//! - [`RequestLog`] — one log line when a request starts, one when it
//!   completes, with method, URI, status, and latency
//! - [`CatchPanic`] — converts a panicking handler into a 500 response so a
//!   single bad request can never take the process down
//!
//! The chain wraps route dispatch as a whole: a request that matches no
//! route still gets logged, and a panic anywhere downstream is still
//! caught.

mod log;
mod recover;

pub use log::RequestLog;
pub use recover::CatchPanic;

use std::sync::Arc;

use crate::handler::BoxFuture;
use crate::request::Request;

/// A stage in the middleware chain.
///
/// A stage receives the request and the remainder of the chain as [`Next`].
/// Calling `next.run(req)` continues processing; not calling it
/// short-circuits with the stage's own response.
///
/// Stages must not suppress downstream faults. [`CatchPanic`] is the single
/// deliberate fault boundary.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;
}

/// The remainder of the chain, ending in route dispatch.
///
/// Owned and `'static`, so a stage may move it onto another task;
/// [`CatchPanic`] relies on this to isolate the rest of the chain.
pub struct Next {
    stack: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    endpoint: Endpoint,
}

/// Terminal of the chain: routes the request and invokes its handler.
pub(crate) type Endpoint = Arc<dyn Fn(Request) -> BoxFuture + Send + Sync>;

impl Next {
    pub(crate) fn new(stack: Arc<[Arc<dyn Middleware>]>, endpoint: Endpoint) -> Self {
        Self { stack, index: 0, endpoint }
    }

    /// Runs the rest of the chain to completion.
    pub fn run(mut self, req: Request) -> BoxFuture {
        match self.stack.get(self.index).map(Arc::clone) {
            Some(stage) => {
                self.index += 1;
                stage.handle(req, self)
            }
            None => (self.endpoint)(req),
        }
    }
}
