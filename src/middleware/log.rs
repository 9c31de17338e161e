//! Request logging stage.

use std::time::Instant;

use tracing::info;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;

/// Logs one info line when a request starts and one when it completes.
///
/// The completion line carries the status and elapsed wall-clock time. The
/// response passes through untouched, and downstream faults are not
/// intercepted here: that is [`CatchPanic`](super::CatchPanic)'s job, and it
/// must sit inside this stage so panicked requests still get a completion
/// line.
pub struct RequestLog;

impl Middleware for RequestLog {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let method = req.method().clone();
        let uri = req.uri().clone();
        Box::pin(async move {
            info!(method = %method, uri = %uri, "request started");
            let start = Instant::now();

            let response = next.run(req).await;

            let elapsed_ms = start.elapsed().as_millis() as u64;
            info!(
                uri = %uri,
                status = response.status_code().as_u16(),
                elapsed_ms,
                "request completed"
            );
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::tests::{chain, request};
    use crate::middleware::Endpoint;
    use crate::Response;
    use http::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn response_passes_through_unaltered() {
        let endpoint: Endpoint = Arc::new(|_req| {
            Box::pin(async {
                Response::builder()
                    .status(StatusCode::CREATED)
                    .header("x-custom", "kept")
                    .text("payload")
            })
        });

        let response = chain(vec![Arc::new(RequestLog)], endpoint)
            .run(request("/anything"))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(response.headers().get("x-custom").unwrap(), "kept");
        assert_eq!(response.body(), b"payload");
    }
}
