//! The two greeting handlers and their JSON payload.

use http::StatusCode;
use serde::Serialize;

use crate::request::Request;
use crate::response::Response;

/// Body of the JSON greeting. Built fresh per request, serialized, and
/// discarded — it carries no identity and is never mutated.
#[derive(Serialize)]
pub struct Greeting {
    pub message: String,
}

/// `GET /` — plain-text greeting.
pub async fn hello(_req: Request) -> Response {
    Response::text("Hello, World!")
}

/// `GET /json` — JSON greeting.
pub async fn json(_req: Request) -> Response {
    let greeting = Greeting { message: "Hello, JSON World!".to_owned() };
    match serde_json::to_vec(&greeting) {
        Ok(body) => Response::json(body),
        // Unreachable for this payload type.
        Err(_) => Response::status(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
