//! Service entry point: telemetry, config, routes, serve, exit code.

use std::process::ExitCode;

use howdy::middleware::{CatchPanic, RequestLog};
use howdy::{greeting, telemetry, Config, Router, Server};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init();

    let config = Config::from_env();

    // RequestLog first: it must wrap CatchPanic so panicked requests still
    // get a completion line.
    let app = Router::new()
        .layer(RequestLog)
        .layer(CatchPanic)
        .get("/", greeting::hello)
        .get("/json", greeting::json);

    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "server failed to start");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.serve(app).await {
        error!(error = %e, "server forced to shut down");
        return ExitCode::FAILURE;
    }

    info!("server exiting");
    ExitCode::SUCCESS
}
