//! Response builder returned by handlers and fallbacks.

use bytes::Bytes;

use super::headers::CONTENT_TYPE;
use super::{ContentType, Headers, StatusCode};

/// An HTTP response produced by a handler.
///
/// # Examples
///
/// ```
/// use remux::http::{ContentType, Response, StatusCode};
///
/// let response = Response::new(StatusCode::Ok)
///     .content_type(ContentType::Json)
///     .body(r#"{"status":"ok"}"#);
///
/// assert_eq!(response.status(), StatusCode::Ok);
/// assert_eq!(response.headers().get("content-type"), Some("application/json"));
/// assert_eq!(response.text(), Some(r#"{"status":"ok"}"#));
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Appends a response header. Multiple calls with the same name are additive.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets `Content-Type`, replacing any earlier value.
    #[must_use]
    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.headers.set(CONTENT_TYPE, content_type.as_str());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as UTF-8 text, or `None` if it is not valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

impl From<StatusCode> for Response {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}
