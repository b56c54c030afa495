//! Inbound HTTP request model.
//!
//! [`InboundRequest`] is the input boundary of the parameter store: it carries
//! the method, URI, headers and raw body of a request, and exposes the
//! request's standard parameters (query string and URL-encoded form body).

use bytes::Bytes;
use http::{header, HeaderMap, Method, Uri};
use indexmap::IndexMap;
use tracing::debug;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// An inbound HTTP request.
///
/// Standard parameters are gathered from the query string first and then
/// from an `application/x-www-form-urlencoded` body. When a name repeats,
/// the first value wins.
///
/// # Example
///
/// ```rust
/// use hermes_params::InboundRequest;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let request = InboundRequest::new(
///     Method::GET,
///     Uri::from_static("/users?limit=10&name=Alice%20Smith"),
///     HeaderMap::new(),
///     Bytes::new(),
/// );
///
/// assert_eq!(request.parameter("limit"), Some("10"));
/// assert_eq!(request.parameter("name"), Some("Alice Smith"));
/// assert_eq!(request.parameter_names().collect::<Vec<_>>(), ["limit", "name"]);
/// ```
#[derive(Debug, Clone)]
pub struct InboundRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    parameters: IndexMap<String, String>,
}

impl InboundRequest {
    /// Creates a new inbound request.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        let mut parameters = IndexMap::new();

        if let Some(query) = uri.query() {
            collect_pairs(query.as_bytes(), "query string", &mut parameters);
        }
        if is_form_urlencoded(&headers) {
            collect_pairs(&body, "form body", &mut parameters);
        }

        Self {
            method,
            uri,
            headers,
            body,
            parameters,
        }
    }

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> InboundRequestBuilder {
        InboundRequestBuilder::new()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Returns the Content-Length header value.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.header(header::CONTENT_LENGTH.as_str())
            .and_then(|v| v.parse().ok())
    }

    /// Returns `true` if this is a POST whose body uses a multipart encoding.
    ///
    /// Other methods are never decomposed, whatever their Content-Type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.method == Method::POST && crate::multipart::is_multipart(&self.headers)
    }

    /// Returns the names of the standard parameters in order of first appearance.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    /// Returns the first value of a standard parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

impl From<http::Request<Bytes>> for InboundRequest {
    fn from(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body)
    }
}

fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

fn collect_pairs(input: &[u8], origin: &str, parameters: &mut IndexMap<String, String>) {
    match serde_urlencoded::from_bytes::<Vec<(String, String)>>(input) {
        Ok(pairs) => {
            for (name, value) in pairs {
                parameters.entry(name).or_insert(value);
            }
        }
        Err(e) => debug!(origin, error = %e, "ignoring undecodable parameters"),
    }
}

/// Builder for constructing an [`InboundRequest`].
///
/// Method defaults to `GET` and URI to `/`.
#[derive(Debug, Default)]
pub struct InboundRequestBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
}

impl InboundRequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header. Invalid values are ignored.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> InboundRequest {
        InboundRequest::new(
            self.method.unwrap_or(Method::GET),
            self.uri.unwrap_or_else(|| Uri::from_static("/")),
            self.headers,
            self.body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parameters() {
        let request = InboundRequest::new(
            Method::GET,
            Uri::from_static("/search?q=rust+lang&limit=10"),
            HeaderMap::new(),
            Bytes::new(),
        );

        assert_eq!(request.path(), "/search");
        assert_eq!(request.query_string(), Some("q=rust+lang&limit=10"));
        assert_eq!(request.parameter("q"), Some("rust lang"));
        assert_eq!(request.parameter("limit"), Some("10"));
        assert_eq!(request.parameter("missing"), None);
    }

    #[test]
    fn test_first_value_wins() {
        let request = InboundRequest::builder()
            .uri(Uri::from_static("/?a=1&a=2"))
            .build();

        assert_eq!(request.parameter("a"), Some("1"));
        assert_eq!(request.parameter_names().count(), 1);
    }

    #[test]
    fn test_form_body_parameters() {
        let request = InboundRequest::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/login?next=%2Fhome"))
            .header("content-type", "application/x-www-form-urlencoded; charset=UTF-8")
            .body("username=alice%40example.com&password=pass%3Dword")
            .build();

        assert_eq!(
            request.parameter_names().collect::<Vec<_>>(),
            ["next", "username", "password"]
        );
        assert_eq!(request.parameter("next"), Some("/home"));
        assert_eq!(request.parameter("username"), Some("alice@example.com"));
        assert_eq!(request.parameter("password"), Some("pass=word"));
    }

    #[test]
    fn test_body_ignored_without_form_content_type() {
        let request = InboundRequest::builder()
            .method(Method::POST)
            .header("content-type", "application/json")
            .body("a=1")
            .build();

        assert_eq!(request.parameter("a"), None);
    }

    #[test]
    fn test_header_access() {
        let request = InboundRequest::builder()
            .method(Method::POST)
            .header("content-type", "multipart/form-data; boundary=x")
            .header("content-length", "100")
            .build();

        assert_eq!(request.content_type(), Some("multipart/form-data; boundary=x"));
        assert_eq!(request.content_length(), Some(100));
        assert!(request.is_multipart());
    }

    #[test]
    fn test_multipart_requires_post() {
        for method in [Method::GET, Method::PUT] {
            let request = InboundRequest::builder()
                .method(method)
                .header("content-type", "multipart/form-data; boundary=x")
                .build();
            assert!(!request.is_multipart());
        }
    }

    #[test]
    fn test_builder_defaults() {
        let request = InboundRequest::builder().build();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert!(request.body().is_empty());
        assert!(!request.is_multipart());
    }

    #[test]
    fn test_from_http_request() {
        let request = http::Request::builder()
            .method(Method::PUT)
            .uri("/items?id=7")
            .body(Bytes::from_static(b"payload"))
            .unwrap();

        let request = InboundRequest::from(request);
        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.parameter("id"), Some("7"));
        assert_eq!(request.body(), &Bytes::from_static(b"payload"));
    }
}
