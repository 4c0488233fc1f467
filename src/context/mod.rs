//! Per-request context handed to handlers.
//!
//! When the router dispatches a request it records which pattern matched and
//! what the pattern captured. Both are read-only for the handler and live
//! exactly as long as the request does.

use crate::Request;
use crate::router::{Capture, Captures};

/// A request together with the outcome of routing it.
///
/// # Examples
///
/// ```rust,no_run
/// use remux::{Context, Response, StatusCode};
///
/// async fn show_blog(ctx: Context) -> Response {
///     match ctx.capture("blogID").map(|id| id.as_u64()) {
///         Some(Ok(id)) => Response::new(StatusCode::Ok).body(format!("blog {id}")),
///         _ => Response::new(StatusCode::BadRequest),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Context {
    request: Request,
    pattern: String,
    captures: Captures,
}

impl Context {
    /// A context for a request that has not been routed; the pattern is empty
    /// and there are no captures.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            pattern: String::new(),
            captures: Captures::new(),
        }
    }

    pub(crate) fn routed(request: Request, pattern: &str, captures: Captures) -> Self {
        Self {
            request,
            pattern: pattern.to_owned(),
            captures,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The raw pattern of the route that matched, as it was registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    /// Shorthand for `self.captures().get(name)`.
    pub fn capture(&self, name: &str) -> Option<&Capture> {
        self.captures.get(name)
    }

    pub fn into_request(self) -> Request {
        self.request
    }
}
