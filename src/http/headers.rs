//! Case-insensitive header map shared by [`Request`](super::Request) and
//! [`Response`](super::Response).

use std::fmt;

/// `Authorization` header name.
pub const AUTHORIZATION: &str = "Authorization";

/// `Connection` header name.
pub const CONNECTION: &str = "Connection";

/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";

/// `X-Content-Type-Options` header name.
pub const X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";

/// An order-preserving, multi-value header map with case-insensitive names.
///
/// # Examples
///
/// ```
/// use remux::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Accept", "text/html");
/// headers.insert("accept", "application/json");
/// assert_eq!(headers.get_all("ACCEPT").count(), 2);
///
/// headers.set("Accept", "*/*");
/// assert_eq!(headers.get("accept"), Some("*/*"));
/// assert_eq!(headers.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value, keeping any existing values for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Replaces every value for `name` with `value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.entries.push((name, value.into()));
    }

    /// Returns the first value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `name` in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Removes every entry for `name`, returning `true` if any existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.entries.len() < before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
