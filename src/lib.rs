//! # remux
//!
//! A regular-expression HTTP request router with typed path captures.
//!
//! Patterns are regular expressions that may capture path segments with
//! `<name>`, `<str:name>` or `<int:name>` tokens. Routes are tried in
//! registration order; the first one that matches the path and allows the
//! method handles the request.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use remux::{Context, Method, Request, Response, Router, StatusCode};
//!
//! async fn thumbnail(ctx: Context) -> Response {
//!     let blog = ctx.capture("blogUID").map(|c| c.as_str()).unwrap_or_default();
//!     match ctx.capture("imageID").map(|c| c.as_u64()) {
//!         Some(Ok(image)) => Response::new(StatusCode::Ok).body(format!("{blog}/{image}")),
//!         _ => Response::new(StatusCode::BadRequest),
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut builder = Router::builder();
//!     builder.handle("^/blog/<blogUID>/images/<int:imageID>/thumbnail$", thumbnail, &[])?;
//!     let router = builder.build();
//!
//!     let response = router
//!         .route(Request::new(Method::Get, "/blog/GjqzmwZ/images/2334/thumbnail"))
//!         .await;
//!     assert_eq!(response.text(), Some("GjqzmwZ/2334"));
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod http;
pub mod router;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use context::Context;
pub use http::{ContentType, Headers, Method, Request, Response, StatusCode};
pub use router::{Resolution, RouteError, Router, RouterBuilder};
