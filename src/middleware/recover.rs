//! Panic recovery stage.

use http::StatusCode;
use tokio::task::JoinError;
use tracing::error;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::Response;

/// Fault boundary for the rest of the chain.
///
/// Runs everything downstream on its own tokio task. If that task panics,
/// the panic is logged at error level and the client receives a 500 with
/// body `Internal Server Error`; the connection and the process both carry
/// on. Responses are fully buffered before hyper writes them, so recovery
/// always has a clean channel to write the 500 into.
pub struct CatchPanic;

impl Middleware for CatchPanic {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin(async move {
            match tokio::spawn(next.run(req)).await {
                Ok(response) => response,
                Err(fault) => {
                    error!(panic = %describe(fault), "handler panicked, responding 500");
                    Response::builder()
                        .status(StatusCode::INTERNAL_SERVER_ERROR)
                        .text("Internal Server Error")
                }
            }
        })
    }
}

fn describe(fault: JoinError) -> String {
    if !fault.is_panic() {
        return fault.to_string();
    }
    let payload = fault.into_panic();
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::tests::{chain, request};
    use crate::middleware::Endpoint;
    use std::sync::Arc;

    fn panicking_endpoint() -> Endpoint {
        Arc::new(|_req| Box::pin(async { panic!("greeting cache poisoned") }))
    }

    #[tokio::test]
    async fn panic_becomes_500() {
        let response = chain(vec![Arc::new(CatchPanic)], panicking_endpoint())
            .run(request("/"))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), b"Internal Server Error");
    }

    #[tokio::test]
    async fn healthy_request_is_untouched() {
        let endpoint: Endpoint =
            Arc::new(|_req| Box::pin(async { Response::text("fine") }));

        let response = chain(vec![Arc::new(CatchPanic)], endpoint)
            .run(request("/"))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.body(), b"fine");
    }

    #[tokio::test]
    async fn chain_survives_repeated_panics() {
        let stack: Arc<[Arc<dyn Middleware>]> = Arc::from(vec![
            Arc::new(CatchPanic) as Arc<dyn Middleware>,
        ]);

        for _ in 0..3 {
            let next = crate::middleware::Next::new(Arc::clone(&stack), panicking_endpoint());
            let response = next.run(request("/")).await;
            assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
