//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. You register a path,
//! you get a handler. The router also carries the middleware stack, which
//! wraps dispatch as a whole — unmatched requests flow through it too.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as PathTree;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Registration methods take and return `self` so routes and layers chain.
pub struct Router {
    routes: HashMap<Method, PathTree<BoxedHandler>>,
    layers: Vec<Arc<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), layers: Vec::new() }
    }

    /// Register a handler for `GET path`.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves
    /// them.
    ///
    /// # Panics
    ///
    /// Panics on a malformed or conflicting path. Routes are registered at
    /// startup, before the listener binds, so this fails the process before
    /// it can accept traffic.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Append a middleware stage.
    ///
    /// The first layer registered is the outermost — it sees the request
    /// first and the response last.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    pub(crate) fn layers(&self) -> &[Arc<dyn Middleware>] {
        &self.layers
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Request, Response};

    async fn ok(_req: Request) -> Response {
        Response::text("ok")
    }

    #[test]
    fn exact_path_matches() {
        let router = Router::new().get("/", ok).get("/json", ok);
        assert!(router.lookup(&Method::GET, "/").is_some());
        assert!(router.lookup(&Method::GET, "/json").is_some());
    }

    #[test]
    fn unknown_path_misses() {
        let router = Router::new().get("/", ok);
        assert!(router.lookup(&Method::GET, "/missing").is_none());
    }

    #[test]
    fn wrong_method_misses() {
        let router = Router::new().get("/json", ok);
        assert!(router.lookup(&Method::POST, "/json").is_none());
    }

    #[test]
    fn path_params_are_captured() {
        let router = Router::new().on(Method::GET, "/greetings/{name}", ok);
        let (_, params) = router.lookup(&Method::GET, "/greetings/world").expect("match");
        assert_eq!(params.get("name").map(String::as_str), Some("world"));
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn duplicate_route_panics_at_startup() {
        let _ = Router::new().get("/json", ok).get("/json", ok);
    }
}
