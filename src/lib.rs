//! # howdy
//!
//! A small greeting service over HTTP. Two routes, structured logs,
//! graceful shutdown. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! howdy serves exactly two endpoints and refuses to grow opinions about
//! anything else. No auth, no rate limiting, no persistence — a proxy or
//! the platform owns those. What howdy does own:
//!
//! - **Exact-path routing** — O(path-length) lookup via [`matchit`]
//! - **A middleware chain** — request logging and a panic boundary, so no
//!   single request can take the process down
//! - **Graceful shutdown** — SIGTERM / Ctrl-C stops the accept loop
//!   immediately and drains in-flight requests under a deadline
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use howdy::middleware::{CatchPanic, RequestLog};
//! use howdy::{greeting, Config, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     howdy::telemetry::init();
//!
//!     let app = Router::new()
//!         .layer(RequestLog)
//!         .layer(CatchPanic)
//!         .get("/", greeting::hello)
//!         .get("/json", greeting::json);
//!
//!     let server = Server::bind(&Config::from_env()).await.expect("bind");
//!     server.serve(app).await.expect("serve");
//! }
//! ```

mod config;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod greeting;
pub mod middleware;
pub mod telemetry;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
