//! Incoming HTTP request type.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{Extensions, HeaderMap, Method};

// ── Query ─────────────────────────────────────────────────────────────────────

/// Decoded query-string pairs, in the order the client sent them.
///
/// Repeated keys are kept. [`get`](Query::get) returns the first value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Decodes a raw `application/x-www-form-urlencoded` query string.
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Removes every pair named `key`, returning the first value removed.
    pub fn take(&mut self, key: &str) -> Option<String> {
        let mut first = None;
        self.pairs.retain_mut(|(k, v)| {
            if k.as_str() != key {
                return true;
            }
            if first.is_none() {
                first = Some(std::mem::take(v));
            }
            false
        });
        first
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool { self.pairs.is_empty() }
}

// ── Request ───────────────────────────────────────────────────────────────────

/// An incoming HTTP request, after routing.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) route: Arc<str>,
    pub(crate) query: Query,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) extensions: Extensions,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        route: Arc<str>,
        query: Query,
        headers: HeaderMap,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, path, route, query, headers, body, params, extensions: Extensions::new() }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The pattern the request matched, e.g. `/users/{id}` for `/users/42`.
    pub fn route(&self) -> &str { &self.route }

    /// Query pairs as seen by the handler. Middleware may have removed some.
    pub fn query(&self) -> &Query { &self.query }
    pub fn query_mut(&mut self) -> &mut Query { &mut self.query }

    /// Header lookup. Header names are case-insensitive; values that are not
    /// visible ASCII are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Values attached to this request by middleware.
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }

    pub fn extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    /// Snapshot of the parts response-phase middleware may consult once the
    /// handler has taken ownership of the request.
    pub(crate) fn head(&self) -> RequestHead {
        RequestHead {
            method: self.method.clone(),
            path: self.path.clone(),
            route: Arc::clone(&self.route),
            query: self.query.clone(),
            extensions: self.extensions.clone(),
        }
    }
}

// ── RequestHead ───────────────────────────────────────────────────────────────

/// The request as it looked when it was handed to the handler.
///
/// Passed to [`Middleware::on_response`](crate::middleware::Middleware::on_response).
/// Owned by a single request; never shared between requests.
#[derive(Clone, Debug)]
pub struct RequestHead {
    method: Method,
    path: String,
    route: Arc<str>,
    query: Query,
    extensions: Extensions,
}

impl RequestHead {
    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn route(&self) -> &str { &self.route }
    pub fn query(&self) -> &Query { &self.query }
    pub fn extensions(&self) -> &Extensions { &self.extensions }

    pub fn extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decodes_pairs_in_order() {
        let q = Query::parse(Some("name=a%20b&page=2&tag=x&tag=y"));
        let pairs: Vec<_> = q.iter().collect();
        assert_eq!(pairs, [("name", "a b"), ("page", "2"), ("tag", "x"), ("tag", "y")]);
        assert_eq!(q.get("tag"), Some("x"));
    }

    #[test]
    fn missing_query_is_empty() {
        assert!(Query::parse(None).is_empty());
        assert!(Query::parse(Some("")).is_empty());
    }

    #[test]
    fn take_removes_every_occurrence_and_returns_first() {
        let mut q = Query::parse(Some("page=3&q=rust&page=9"));
        assert_eq!(q.take("page").as_deref(), Some("3"));
        assert!(!q.contains("page"));
        assert_eq!(q.get("q"), Some("rust"));
        assert_eq!(q.take("page"), None);
    }
}
