//! The per-request context handed to handlers.
//!
//! [`RequestContext`] owns everything the binder can read from one request:
//! method and path, matched path variables, decoded query pairs, HTTP
//! headers, the request-scoped value store, and the raw body. It is built
//! once by the host with [`RequestContext::builder`], then shared with the
//! handler as `Arc<RequestContext>`.
//!
//! # Named values and headers
//!
//! The value store is a plain string map. Hosts that want headers visible
//! through it call [`propagate_headers`](RequestContext::propagate_headers),
//! which copies every header in under its canonical name (`X-Request-Id`).
//! Header-tagged fields check the value store first and then the raw headers,
//! so they bind whether or not propagation ran.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use rivet_core::RequestSource;
use tracing::debug;

/// Everything a handler can learn about the request it is serving.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    path_params: HashMap<String, String>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    values: HashMap<String, String>,
    body: Bytes,
}

impl RequestContext {
    /// Starts building a context for `method` on `path`.
    pub fn builder(method: Method, path: impl Into<String>) -> RequestContextBuilder {
        RequestContextBuilder {
            inner: Self {
                method,
                path: path.into(),
                path_params: HashMap::new(),
                query: Vec::new(),
                headers: HeaderMap::new(),
                values: HashMap::new(),
                body: Bytes::new(),
            },
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw body bytes.
    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }

    /// All path variables matched by the router.
    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    /// Decoded query pairs in request order; repeated names are kept.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Stores a request-scoped value, replacing any previous one.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Copies every header with a UTF-8 value into the value store.
    ///
    /// Keys are canonical header names (`x-trace-id` becomes `X-Trace-Id`).
    /// Values already in the store are left alone; for repeated headers the
    /// first one wins.
    pub fn propagate_headers(&mut self) {
        for (name, value) in &self.headers {
            let Ok(value) = value.to_str() else {
                debug!(header = %name, "Skipping non-UTF-8 header");
                continue;
            };
            self.values
                .entry(canonical_header_name(name.as_str()))
                .or_insert_with(|| value.to_string());
        }
    }
}

impl RequestSource for RequestContext {
    fn body(&self) -> &[u8] {
        &self.body
    }

    fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.value(name)
            .or_else(|| self.headers.get(name).and_then(|v| v.to_str().ok()))
    }
}

/// Canonical MIME header form: the first letter and every letter after a
/// hyphen are upper-cased, the rest lower-cased.
pub fn canonical_header_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`RequestContext`].
///
/// ```rust
/// use http::Method;
/// use rivet_framework::RequestContext;
///
/// let ctx = RequestContext::builder(Method::GET, "/users/42")
///     .path_param("id", "42")
///     .query("name=User%20Name&age=27")
///     .header("x-trace", "abc")
///     .build();
///
/// assert_eq!(ctx.query_pairs().len(), 2);
/// ```
#[derive(Debug)]
pub struct RequestContextBuilder {
    inner: RequestContext,
}

impl RequestContextBuilder {
    /// Adds a matched path variable.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.path_params.insert(name.into(), value.into());
        self
    }

    /// Appends the pairs of a raw (still percent-encoded) query string.
    ///
    /// A query string that cannot be decoded is ignored.
    pub fn query(mut self, raw: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
            Ok(pairs) => self.inner.query.extend(pairs),
            Err(e) => debug!(query = raw, error = %e, "Ignoring undecodable query string"),
        }
        self
    }

    /// Appends one decoded query pair.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.query.push((name.into(), value.into()));
        self
    }

    /// Appends a header. Invalid names or values are ignored.
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        HeaderValue: TryFrom<V>,
    {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.inner.headers.append(name, value);
            }
            _ => debug!("Ignoring invalid header"),
        }
        self
    }

    /// Replaces all headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.inner.headers = headers;
        self
    }

    /// Stores a request-scoped value.
    pub fn value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.set_value(name, value);
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.inner.body = body.into();
        self
    }

    /// Sets a JSON body.
    pub fn json(self, body: serde_json::Value) -> Self {
        self.body(body.to_string())
    }

    pub fn build(self) -> RequestContext {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_query_decoding_keeps_first_value() {
        let ctx = RequestContext::builder(Method::GET, "/basic")
            .query("name=User+Name&age=27&age=30&empty=")
            .build();

        assert_eq!(ctx.query_param("name"), Some("User Name"));
        assert_eq!(ctx.query_param("age"), Some("27"));
        assert_eq!(ctx.query_param("empty"), Some(""));
        assert_eq!(ctx.query_param("missing"), None);
    }

    #[test]
    fn test_header_lookup_prefers_values() {
        let ctx = RequestContext::builder(Method::GET, "/")
            .header("x-trace", "from-header")
            .value("X-Tenant", "acme")
            .build();

        assert_eq!(ctx.header("X-Trace"), Some("from-header"));
        assert_eq!(ctx.header("X-Tenant"), Some("acme"));
        assert_eq!(ctx.value("X-Trace"), None);

        let ctx = RequestContext::builder(Method::GET, "/")
            .header("x-trace", "from-header")
            .value("X-Trace", "from-value")
            .build();
        assert_eq!(ctx.header("X-Trace"), Some("from-value"));
    }

    #[test]
    fn test_propagate_headers() {
        let mut ctx = RequestContext::builder(Method::GET, "/")
            .header("x-request-id", "r-1")
            .header("content-type", "application/json")
            .value("X-Request-Id", "kept")
            .build();

        ctx.propagate_headers();

        assert_eq!(ctx.value("X-Request-Id"), Some("kept"));
        assert_eq!(ctx.value("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("x-request-id"), "X-Request-Id");
        assert_eq!(canonical_header_name("CONTENT-TYPE"), "Content-Type");
        assert_eq!(canonical_header_name("accept"), "Accept");
    }

    #[test]
    fn test_json_body() {
        let ctx = RequestContext::builder(Method::POST, "/users")
            .json(json!({"name": "A"}))
            .build();
        assert_eq!(ctx.body(), br#"{"name":"A"}"#);
        assert_eq!(ctx.method(), &Method::POST);
    }
}
