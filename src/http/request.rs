//! The request view handed to the router.
//!
//! Wire parsing is the job of whatever server hosts the router; here a
//! [`Request`] is assembled programmatically from a method and a request
//! target.

use bytes::Bytes;

use super::headers::CONTENT_TYPE;
use super::{Headers, Method};

/// An inbound HTTP request.
///
/// # Examples
///
/// ```
/// use remux::http::{Method, Request};
///
/// let request = Request::new(Method::Get, "/search?q=rust&page=2")
///     .header("Content-Type", "application/json");
///
/// assert_eq!(request.path(), "/search");
/// assert_eq!(request.query_string(), Some("q=rust&page=2"));
/// assert_eq!(request.content_type(), Some("application/json"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Headers,
    body: Bytes,
}

impl Request {
    /// Builds a request from a method and a request target (`path?query`).
    pub fn new(method: Method, target: impl AsRef<str>) -> Self {
        let target = target.as_ref();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
            None => (target.to_owned(), None),
        };

        Self {
            method,
            path,
            query,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Appends a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path, without the query string and before any
    /// normalization.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the raw query string (without the leading `?`), if any.
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the `Content-Type` header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)
    }

    pub fn payload(&self) -> &Bytes {
        &self.body
    }
}
