//! Content types used when rendering fallback responses.

use std::fmt;

/// The media types the router knows how to render a body in.
///
/// # Examples
///
/// ```
/// use remux::http::ContentType;
///
/// assert_eq!(ContentType::negotiate(Some("Application/JSON; charset=utf-8")), ContentType::Json);
/// assert_eq!(ContentType::negotiate(Some("text/html")), ContentType::Html);
/// assert_eq!(ContentType::negotiate(None), ContentType::Plain);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Plain,
    Html,
    Json,
    Binary,
}

impl ContentType {
    /// Header value written on responses of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "text/plain; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::Json => "application/json",
            Self::Binary => "application/octet-stream",
        }
    }

    /// Pick the body format for a response from the request's `Content-Type`.
    ///
    /// Only the media-type essence (before any `;` parameters) is compared,
    /// case-insensitively. JSON and HTML are honoured; anything else,
    /// including a missing or empty header, falls back to plain text.
    pub fn negotiate(header: Option<&str>) -> Self {
        let essence = header
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match essence.as_str() {
            "application/json" => Self::Json,
            "text/html" => Self::Html,
            _ => Self::Plain,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
