//! HTTP server and graceful shutdown.
//!
//! # Shutdown sequencing
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. Immediately stops `listener.accept()` — no new connections are made.
//! 2. Tells every in-flight connection to finish its current request and
//!    close (idle keep-alive connections close at once).
//! 3. Waits for the drain, bounded by [`Config::shutdown_grace`]. A clean
//!    drain returns `Ok` from [`Server::serve`]; blowing the deadline
//!    aborts the stragglers and returns [`Error::DrainTimeout`], which
//!    `main` treats as fatal.
//!
//! Platforms that send SIGKILL after their own grace period (Kubernetes
//! defaults to 30 s) should keep that period at least as long as
//! `shutdown_grace`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::middleware::{Endpoint, Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// The HTTP server.
pub struct Server {
    listener: TcpListener,
    addr: SocketAddr,
    config: Config,
}

impl Server {
    /// Binds the listen socket.
    ///
    /// Binding happens here, not in [`serve`](Server::serve), so a taken
    /// port surfaces before anything else starts. A bind failure is not
    /// retried.
    pub async fn bind(config: &Config) -> Result<Self, Error> {
        let requested = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(requested)
            .await
            .map_err(|source| Error::Bind { addr: requested, source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| Error::Bind { addr: requested, source })?;
        Ok(Self { listener, addr, config: config.clone() })
    }

    /// The bound address. Differs from the configured one when port 0 was
    /// requested.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown: SIGTERM or Ctrl-C,
    /// followed by in-flight requests completing within the grace period.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// [`serve`](Server::serve) with an injectable shutdown trigger.
    ///
    /// Production wires the OS-signal future; tests wire whatever they
    /// like.
    pub async fn serve_with_shutdown<F>(self, router: Router, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send,
    {
        // Arc so the routing table is shared across concurrent connection
        // tasks without copying it.
        let router = Arc::new(router);
        let stack: Arc<[Arc<dyn Middleware>]> = Arc::from(router.layers().to_vec());
        let endpoint = route_endpoint(Arc::clone(&router));

        // Connection hard cap: the larger of the idle allowance and one
        // full request/response exchange. hyper has no per-write deadline,
        // so the write budget rides on this.
        let conn_deadline = self
            .config
            .idle_timeout
            .max(self.config.read_timeout + self.config.write_timeout);

        let mut http = http1::Builder::new();
        http.timer(TokioTimer::new())
            .header_read_timeout(self.config.read_timeout)
            .keep_alive(true);

        info!(addr = %self.addr, "listening");

        // GracefulShutdown tracks every watched connection and, once
        // triggered, tells each to finish its current exchange and close.
        let graceful = GracefulShutdown::new();

        // JoinSet tracks the connection tasks themselves, for the in-flight
        // count and for force-abort when the drain deadline blows.
        let mut tasks = JoinSet::new();

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // biased: check the shutdown arm first so a termination
                // signal stops accepting immediately, even with connections
                // queued on the listener.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = self.listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let io = TokioIo::new(stream);
                    let stack = Arc::clone(&stack);
                    let endpoint = Arc::clone(&endpoint);
                    // Called once per request on the connection, not once
                    // per connection.
                    let svc = service_fn(move |req| {
                        dispatch(Arc::clone(&stack), Arc::clone(&endpoint), req)
                    });

                    let conn = graceful.watch(http.serve_connection(io, svc));
                    tasks.spawn(async move {
                        match tokio::time::timeout(conn_deadline, conn).await {
                            Ok(Ok(())) => {}
                            Ok(Err(e)) => error!(peer = %remote_addr, "connection error: {e}"),
                            Err(_) => warn!(peer = %remote_addr, "connection exceeded deadline, closing"),
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not
                // grow without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        // Close the socket before draining; nothing new can arrive while
        // in-flight requests finish.
        drop(self.listener);

        tokio::select! {
            () = graceful.shutdown() => {
                info!("server stopped");
                Ok(())
            }
            () = tokio::time::sleep(self.config.shutdown_grace) => {
                tasks.abort_all();
                Err(Error::DrainTimeout { grace: self.config.shutdown_grace })
            }
        }
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Core hot path: runs one request through the middleware chain and route
/// dispatch.
///
/// The error type is [`Infallible`](std::convert::Infallible) — all
/// failures are handled internally (404, 500) so hyper never sees an error.
async fn dispatch(
    stack: Arc<[Arc<dyn Middleware>]>,
    endpoint: Endpoint,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible> {
    let (parts, body) = req.into_parts();
    // A client that dies mid-body gets an empty body, not an error path;
    // the connection is already lost and the response will go nowhere.
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => Bytes::new(),
    };

    let request = Request::new(parts.method, parts.uri, parts.headers, body);
    let response = Next::new(stack, endpoint).run(request).await;
    Ok(response.into_inner())
}

/// Terminal of the middleware chain: route lookup plus handler invocation.
/// Requests that match no route resolve to 404 here, downstream of the
/// logging stage.
fn route_endpoint(router: Arc<Router>) -> Endpoint {
    Arc::new(move |mut req: Request| {
        let router = Arc::clone(&router);
        Box::pin(async move {
            match router.lookup(req.method(), req.path()) {
                Some((handler, params)) => {
                    req.set_params(params);
                    handler.call(req).await
                }
                None => Response::status(StatusCode::NOT_FOUND),
            }
        })
    })
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** (what init systems and
/// orchestrators send) and **SIGINT** (Ctrl-C, for local dev). On other
/// platforms only Ctrl-C is available.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    // `pending()` never resolves — on non-Unix platforms the SIGTERM arm
    // is effectively disabled.
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
}
