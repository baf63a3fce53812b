//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! A [`Response`] keeps its body as a typed [`Body`] until the very end of the
//! pipeline, so response-phase middleware can reshape JSON without re-parsing
//! bytes. Serialisation happens once, when the server writes the response.

use bytes::Bytes;
use http::{Extensions, HeaderName, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::Error;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`ResponseBuilder::bytes`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Csv,          // text/csv
    EventStream,  // text/event-stream  (SSE)
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream  (binary / file download)
    Pdf,          // application/pdf
    Text,         // text/plain; charset=utf-8
    Xml,          // application/xml
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv         => "text/csv",
            Self::EventStream => "text/event-stream",
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Pdf         => "application/pdf",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// The payload of a [`Response`].
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Empty,
    /// `text/plain; charset=utf-8`.
    Text(String),
    /// `application/json`. Object keys keep insertion order.
    Json(Value),
    /// Opaque bytes with an explicit content type. Never inspected.
    Bytes(ContentType, Vec<u8>),
}

impl Body {
    fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty          => None,
            Self::Text(_)        => Some(ContentType::Text.as_str()),
            Self::Json(_)        => Some(ContentType::Json.as_str()),
            Self::Bytes(ct, _)   => Some(ct.as_str()),
        }
    }

    fn into_bytes(self) -> Result<Bytes, serde_json::Error> {
        Ok(match self {
            Self::Empty          => Bytes::new(),
            Self::Text(s)        => Bytes::from(s),
            Self::Json(v)        => Bytes::from(serde_json::to_vec(&v)?),
            Self::Bytes(_, data) => Bytes::from(data),
        })
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use pagemeta::{Response, StatusCode};
/// use serde_json::json;
///
/// Response::json(json!({ "id": 1 }));
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// ```
///
/// # Builder (custom status, headers or extensions)
///
/// ```rust
/// use pagemeta::{ContentType, Response, StatusCode};
/// use pagemeta::middleware::paginate::Count;
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header("location", "/users/42")
///     .json(serde_json::json!({ "id": 42 }));
///
/// Response::builder()
///     .extension(Count(120))
///     .json(vec!["a", "b"]);
///
/// Response::builder()
///     .bytes(ContentType::Xml, b"<ok/>".to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Body,
    pub(crate) extensions: Extensions,
}

impl Response {
    /// `200 OK` — `application/json`.
    ///
    /// A value that cannot be represented as JSON (e.g. a map with
    /// non-string keys) yields `500 Internal Server Error`.
    pub fn json(body: impl Serialize) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self::builder().status(code).no_body()
    }

    /// Builder for responses that need a custom status, extra headers or
    /// extensions.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder {
            headers: Vec::new(),
            status: StatusCode::OK,
            extensions: Extensions::new(),
        }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn body(&self) -> &Body { &self.body }
    pub fn body_mut(&mut self) -> &mut Body { &mut self.body }

    /// Extra headers, in insertion order. A `content-type` entry here is
    /// only sent when the body does not determine one.
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive lookup. `content-type` is answered from the body
    /// when the body has one.
    pub fn header(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("content-type") {
            if let Some(ct) = self.body.content_type() {
                return Some(ct);
            }
        }
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Values attached by the handler for response-phase middleware.
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }

    /// The body as JSON, if it is a JSON body.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Serialises the body and converts to the hyper response type.
    ///
    /// Never fails: a body that cannot be serialised or a header hyper
    /// rejects turns the whole response into a bare `500`.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let content_type = self.body.content_type();
        let body = match self.body.into_bytes() {
            Ok(b) => b,
            Err(e) => {
                error!("response serialisation failed: {e}");
                return internal_error();
            }
        };

        let mut res = http::Response::new(Full::new(body));
        *res.status_mut() = self.status;
        let headers = res.headers_mut();
        if let Some(ct) = content_type {
            headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        for (name, value) in self.headers {
            if content_type.is_some() && name.eq_ignore_ascii_case("content-type") {
                debug!(value = %value, "content-type header overridden by body");
                continue;
            }
            let parsed = HeaderName::try_from(name.as_str())
                .ok()
                .zip(HeaderValue::try_from(value.as_str()).ok());
            match parsed {
                Some((n, v)) => { headers.append(n, v); }
                None => {
                    error!(header = %name, "invalid response header");
                    return internal_error();
                }
            }
        }
        res
    }
}

fn internal_error() -> http::Response<Full<Bytes>> {
    let mut res = http::Response::new(Full::new(Bytes::new()));
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    res
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method — you always know what you're sending.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: StatusCode,
    extensions: Extensions,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Attach a typed value for response-phase middleware to read.
    pub fn extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: impl Serialize) -> Response {
        match serde_json::to_value(body) {
            Ok(v) => self.finish(Body::Json(v)),
            Err(e) => {
                error!("json body serialisation failed: {e}");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(Body::Text(body.into()))
    }

    /// Terminate with a typed body. Use this for XML, HTML, binary, SSE, etc.
    pub fn bytes(self, content_type: ContentType, body: Vec<u8>) -> Response {
        self.finish(Body::Bytes(content_type, body))
    }

    /// Terminate with no body (e.g. `204 No Content`, `301 Moved Permanently`).
    pub fn no_body(self) -> Response {
        self.finish(Body::Empty)
    }

    fn finish(self, body: Body) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body,
            extensions: self.extensions,
        }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for Value {
    fn into_response(self) -> Response { Response::builder().finish(Body::Json(self)) }
}

/// Return a status directly from a handler: `return StatusCode::NOT_FOUND`
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

impl<T: IntoResponse> IntoResponse for Result<T, Error> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn collect(res: Response) -> (http::response::Parts, Bytes) {
        let (parts, body) = res.into_http().into_parts();
        let bytes = body.collect().await.map(|c| c.to_bytes()).unwrap_or_default();
        (parts, bytes)
    }

    #[tokio::test]
    async fn json_keeps_key_order_on_the_wire() {
        let mut map = serde_json::Map::new();
        map.insert("zeta".into(), json!(1));
        map.insert("alpha".into(), json!(2));
        let (parts, bytes) = collect(Response::json(Value::Object(map))).await;

        assert_eq!(parts.headers["content-type"], "application/json");
        assert_eq!(&bytes[..], br#"{"zeta":1,"alpha":2}"#);
    }

    #[tokio::test]
    async fn builder_headers_and_status_reach_hyper() {
        let res = Response::builder()
            .status(StatusCode::CREATED)
            .header("location", "/users/42")
            .text("made");
        assert_eq!(res.header("Content-Type"), Some("text/plain; charset=utf-8"));

        let (parts, bytes) = collect(res).await;
        assert_eq!(parts.status, StatusCode::CREATED);
        assert_eq!(parts.headers["location"], "/users/42");
        assert_eq!(&bytes[..], b"made");
    }

    #[tokio::test]
    async fn invalid_header_becomes_500() {
        let res = Response::builder().header("bad header", "x").text("nope");
        let (parts, bytes) = collect(res).await;
        assert_eq!(parts.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn body_content_type_wins_over_header() {
        let res = Response::builder().header("Content-Type", "text/html").json(json!([1]));
        assert_eq!(res.header("content-type"), Some("application/json"));

        let (parts, _) = collect(res).await;
        let values: Vec<_> = parts.headers.get_all("content-type")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert_eq!(values, ["application/json"]);
    }

    #[tokio::test]
    async fn header_content_type_kept_without_body() {
        let res = Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header("content-type", "application/json")
            .no_body();
        assert_eq!(res.header("content-type"), Some("application/json"));

        let (parts, _) = collect(res).await;
        assert_eq!(parts.headers.get_all("content-type").iter().count(), 1);
    }

    #[test]
    fn unserialisable_json_is_500() {
        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], "v");
        let res = Response::json(bad);
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body(), &Body::Empty);
    }

    #[test]
    fn invalid_parameter_error_is_400_json() {
        let res = Err::<Response, _>(Error::InvalidParameter { name: "page", value: "x".into() })
            .into_response();
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(res.json_body(), Some(&json!({
            "error": "invalid_parameter",
            "parameter": "page",
            "value": "x",
        })));
    }
}
