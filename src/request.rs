//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

/// An incoming HTTP request.
///
/// The body is collected before the middleware chain runs, so a `Request`
/// owns everything it exposes and can move freely across tasks. Path
/// parameters are filled in by the router once a route matches; middleware
/// running ahead of dispatch sees an empty parameter map.
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self { method, uri, headers, body, params: HashMap::new() }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        let mut headers = HeaderMap::new();
        headers.insert("x-test", http::HeaderValue::from_static("yes"));
        Request::new(Method::GET, Uri::from_static("/json?verbose=1"), headers, Bytes::new())
    }

    #[test]
    fn path_strips_query() {
        assert_eq!(request().path(), "/json");
    }

    #[test]
    fn header_lookup() {
        let req = request();
        assert_eq!(req.header("x-test"), Some("yes"));
        assert_eq!(req.header("X-Test"), Some("yes"));
        assert_eq!(req.header("missing"), None);
    }

    #[test]
    fn params_empty_until_routed() {
        let mut req = request();
        assert_eq!(req.param("id"), None);
        req.set_params(HashMap::from([("id".to_owned(), "42".to_owned())]));
        assert_eq!(req.param("id"), Some("42"));
    }
}
