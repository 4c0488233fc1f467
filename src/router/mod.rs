//! Request routing: map regular-expression patterns and HTTP methods to
//! handler functions.
//!
//! Routes are registered on a [`RouterBuilder`] and frozen into an immutable
//! [`Router`] by [`RouterBuilder::build`]. Patterns are regular expressions
//! that may contain capture tokens (see [`Pattern`]):
//!
//! | Pattern                           | Example match                 | Captures                     |
//! |-----------------------------------|-------------------------------|------------------------------|
//! | `^/users$`                        | `/users`                      | *(none)*                     |
//! | `^/blog/<int:blogID>`             | `/blog/1234`                  | `blogID → 1234` (int)        |
//! | `^/blog/<blogUID>/images`         | `/blog/GjqzmwZ/images/2`      | `blogUID → "GjqzmwZ"` (str)  |
//! | `/fo(o\|bar)/`                    | `/a/b/foo/c`                  | *(none)*                     |
//!
//! A pattern matches when it is found anywhere in the normalized path; anchor
//! it with `^` and `$` to match the whole path. Routes are tried in
//! registration order and the first one whose pattern matches and whose
//! methods allow the request wins, whatever its specificity. A route
//! registered without methods answers `GET` only. When some route matched
//! the path but none allowed the method the request is answered
//! `405 Method Not Allowed`, otherwise `404 Not Found`.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::context::Context;
use crate::{Method, Request, Response};

pub mod capture;
pub mod fallback;
pub mod path;
pub mod pattern;

pub use capture::{Capture, CaptureError, CaptureValue, Captures, Converter};
pub use path::normalize;
pub use pattern::{Pattern, PatternError};

/// Type-erased, heap-allocated async handler that processes a [`Context`] and returns a
/// [`Response`].
///
/// Handlers are stored behind `Arc<dyn Fn(…)>` so a frozen router can be shared across
/// threads without copying the underlying closure. Register handlers through
/// [`RouterBuilder::handle`] or the method-specific helpers instead of building this
/// type directly.
pub type Handler =
    Arc<dyn Fn(Context) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` implements this trait through the blanket impl below.
pub trait IntoHandler: Send + Sync + 'static {
    /// Call the handler with the given context, boxing the returned future.
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(ctx))
    }
}

/// Errors raised while registering routes.
///
/// These are configuration mistakes; a caller is expected to abort start-up
/// on them rather than serve with a partial route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("pattern `{0}` already registered")]
    Duplicate(String),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// What a route dispatches to.
pub enum Target {
    Handler(Handler),
    /// A frozen sub-router, resolved recursively in place of this route.
    Router(Router),
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("Handler"),
            Self::Router(router) => f.debug_tuple("Router").field(router).finish(),
        }
    }
}

/// A single registered route binding a pattern and allowed methods to a target.
#[derive(Debug)]
pub struct Route {
    pattern: Pattern,
    methods: Vec<Method>,
    target: Target,
}

impl Route {
    /// The pattern as it was registered.
    pub fn pattern(&self) -> &str {
        self.pattern.raw()
    }

    /// The regular expression the pattern expanded to.
    pub fn regex(&self) -> &str {
        self.pattern.regex()
    }

    /// The explicitly allowed methods; empty means `GET` only.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Capture names declared by the pattern and their converters.
    pub fn captures(&self) -> &HashMap<String, Converter> {
        self.pattern.descriptors()
    }

    /// Whether this route mounts a nested [`Router`].
    pub fn is_nested(&self) -> bool {
        matches!(self.target, Target::Router(_))
    }

    fn allows(&self, method: &Method) -> bool {
        if self.methods.is_empty() {
            return *method == Method::Get;
        }
        self.methods.contains(method)
    }

    // Builds the capture set from the named groups that took part in the match.
    fn match_path(&self, path: &str) -> Option<Captures> {
        let regex = self.pattern.compiled();
        let found = regex.captures(path)?;

        let captures = regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                let value = found.name(name)?;
                let converter = self.pattern.converter(name)?;
                Some(Capture::new(name, converter, value.as_str()))
            })
            .collect();

        Some(captures)
    }
}

/// A successful resolution: the handler to run and what to tell it.
#[derive(Clone)]
pub struct RouteMatch<'r> {
    handler: &'r Handler,
    pattern: &'r str,
    captures: Captures,
}

impl<'r> RouteMatch<'r> {
    pub fn handler(&self) -> &'r Handler {
        self.handler
    }

    /// The raw pattern of the matching route.
    pub fn pattern(&self) -> &'r str {
        self.pattern
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn into_captures(self) -> Captures {
        self.captures
    }
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("captures", &self.captures)
            .finish_non_exhaustive()
    }
}

/// Outcome of [`Router::resolve`].
#[derive(Debug, Clone)]
pub enum Resolution<'r> {
    Found(RouteMatch<'r>),
    /// At least one route matched the path, but none allowed the method.
    MethodNotAllowed,
    NotFound,
}

impl Resolution<'_> {
    /// The status a server should answer with when nothing was found.
    pub fn status(&self) -> Option<crate::StatusCode> {
        match self {
            Self::Found(_) => None,
            Self::MethodNotAllowed => Some(crate::StatusCode::MethodNotAllowed),
            Self::NotFound => Some(crate::StatusCode::NotFound),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Registers routes before they are frozen into a [`Router`].
///
/// # Examples
///
/// ```rust
/// use remux::{Context, Method, Response, Router, StatusCode};
///
/// # fn main() -> Result<(), remux::router::RouteError> {
/// let mut builder = Router::builder();
/// builder.handle(
///     "^/blog/<int:blogID>$",
///     |_ctx: Context| async { Response::new(StatusCode::Ok) },
///     &[Method::Get],
/// )?;
/// builder.post("^/blog$", |_ctx: Context| async { Response::new(StatusCode::Created) })?;
///
/// let router = builder.build();
/// assert_eq!(router.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RouterBuilder {
    routes: Vec<Route>,
}

impl RouterBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `pattern`, answering only the given `methods`
    /// (`GET` when empty).
    ///
    /// # Errors
    ///
    /// - [`RouteError::Duplicate`]: `pattern` was already registered verbatim.
    /// - [`RouteError::Pattern`]: `pattern` does not compile.
    pub fn handle(
        &mut self,
        pattern: &str,
        handler: impl IntoHandler,
        methods: &[Method],
    ) -> Result<&mut Self, RouteError> {
        let handler: Handler = Arc::new(move |ctx| handler.call(ctx));
        self.add_route(pattern, Target::Handler(handler), methods)
    }

    /// Register a handler for `GET` requests matching `pattern`.
    pub fn get(
        &mut self,
        pattern: &str,
        handler: impl IntoHandler,
    ) -> Result<&mut Self, RouteError> {
        self.handle(pattern, handler, &[Method::Get])
    }

    /// Register a handler for `POST` requests matching `pattern`.
    pub fn post(
        &mut self,
        pattern: &str,
        handler: impl IntoHandler,
    ) -> Result<&mut Self, RouteError> {
        self.handle(pattern, handler, &[Method::Post])
    }

    pub fn put(
        &mut self,
        pattern: &str,
        handler: impl IntoHandler,
    ) -> Result<&mut Self, RouteError> {
        self.handle(pattern, handler, &[Method::Put])
    }

    pub fn delete(
        &mut self,
        pattern: &str,
        handler: impl IntoHandler,
    ) -> Result<&mut Self, RouteError> {
        self.handle(pattern, handler, &[Method::Delete])
    }

    pub fn patch(
        &mut self,
        pattern: &str,
        handler: impl IntoHandler,
    ) -> Result<&mut Self, RouteError> {
        self.handle(pattern, handler, &[Method::Patch])
    }

    pub fn options(
        &mut self,
        pattern: &str,
        handler: impl IntoHandler,
    ) -> Result<&mut Self, RouteError> {
        self.handle(pattern, handler, &[Method::Options])
    }

    /// Mount a frozen router at this position of the route table.
    ///
    /// During resolution the nested routes are tried, in their own order,
    /// when this route's turn comes. If none of them handles the request but
    /// `pattern` matches the path, the mount point answers for it: scanning
    /// stops with the nested `404` or `405` when the method is `GET`, and a
    /// `405` is recorded otherwise.
    pub fn nest(&mut self, pattern: &str, router: Router) -> Result<&mut Self, RouteError> {
        self.add_route(pattern, Target::Router(router), &[])
    }

    fn add_route(
        &mut self,
        pattern: &str,
        target: Target,
        methods: &[Method],
    ) -> Result<&mut Self, RouteError> {
        if self.routes.iter().any(|route| route.pattern() == pattern) {
            return Err(RouteError::Duplicate(pattern.to_owned()));
        }

        let pattern = Pattern::compile(pattern)?;
        debug!(
            pattern = pattern.raw(),
            regex = pattern.regex(),
            methods = ?methods,
            nested = matches!(target, Target::Router(_)),
            "route registered"
        );

        self.routes.push(Route {
            pattern,
            methods: methods.to_vec(),
            target,
        });
        Ok(self)
    }

    /// Freeze the route table.
    pub fn build(self) -> Router {
        debug!(routes = self.routes.len(), "router built");
        Router {
            routes: self.routes,
        }
    }
}

/// A frozen, immutable route table.
///
/// `Router` is `Send + Sync` and never changes after [`RouterBuilder::build`],
/// so it can be shared across tasks in an [`Arc`] and consulted concurrently
/// without locking.
///
/// # Examples
///
/// ```rust,no_run
/// use remux::{Context, Method, Request, Response, Router, StatusCode};
///
/// # async fn example() -> Result<(), remux::router::RouteError> {
/// let mut builder = Router::builder();
/// builder.handle("^/person/<int:id>$", |ctx: Context| async move {
///     let id = ctx.capture("id").map(|c| c.as_str().to_owned()).unwrap_or_default();
///     Response::new(StatusCode::Ok).body(id)
/// }, &[])?;
/// let router = builder.build();
///
/// let response = router.route(Request::new(Method::Get, "/person/42")).await;
/// assert_eq!(response.text(), Some("42"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Start building a router; shorthand for [`RouterBuilder::new`].
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Return the number of routes in this router, counting a nested router as one.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Find the route for `method` and `path`.
    ///
    /// `path` is normalized with [`normalize`] first. Resolution is a pure
    /// function of the frozen table, so repeated calls give the same result.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let path = normalize(path);
        let resolution = self.find(method, &path);
        match &resolution {
            Resolution::Found(found) => {
                trace!(%method, path = %path, pattern = found.pattern, "route matched");
            }
            other => trace!(%method, path = %path, outcome = ?other, "no route"),
        }
        resolution
    }

    fn find(&self, method: &Method, path: &str) -> Resolution<'_> {
        let mut wrong_method = false;

        for route in &self.routes {
            let handler = match &route.target {
                Target::Router(nested) => {
                    let inner = match nested.find(method, path) {
                        found @ Resolution::Found(_) => return found,
                        other => other,
                    };
                    if route.match_path(path).is_none() {
                        if matches!(inner, Resolution::MethodNotAllowed) {
                            wrong_method = true;
                        }
                        continue;
                    }
                    // The mount point claims the path: the nested outcome is final.
                    if route.allows(method) {
                        return inner;
                    }
                    wrong_method = true;
                    continue;
                }
                Target::Handler(handler) => handler,
            };

            let Some(captures) = route.match_path(path) else {
                continue;
            };

            if route.allows(method) {
                return Resolution::Found(RouteMatch {
                    handler,
                    pattern: route.pattern(),
                    captures,
                });
            }
            wrong_method = true;
        }

        if wrong_method {
            Resolution::MethodNotAllowed
        } else {
            Resolution::NotFound
        }
    }

    /// Dispatch `request` to the first matching route and return its response.
    ///
    /// The handler receives a [`Context`] carrying the matched pattern and the
    /// captures. Unroutable requests are answered by [`fallback`] with `404`
    /// or `405`, and a request target of `*` with `400`.
    pub async fn route(&self, request: Request) -> Response {
        if request.path() == "*" {
            debug!(method = %request.method(), "rejecting `*` request target");
            return fallback::asterisk_target_response(&request);
        }

        match self.resolve(request.method(), request.path()) {
            Resolution::Found(found) => {
                let handler = Arc::clone(found.handler);
                let ctx = Context::routed(request, found.pattern, found.captures);
                handler(ctx).await
            }
            Resolution::MethodNotAllowed => {
                debug!(method = %request.method(), path = request.path(), "method not allowed");
                fallback::method_not_allowed_response(&request)
            }
            Resolution::NotFound => {
                debug!(method = %request.method(), path = request.path(), "no route found");
                fallback::not_found_response(&request)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusCode;

    async fn ok(_ctx: Context) -> Response {
        Response::new(StatusCode::Ok)
    }

    // Echoes the matched pattern so tests can tell routes apart.
    async fn echo_pattern(ctx: Context) -> Response {
        Response::new(StatusCode::Ok).body(ctx.pattern().to_owned())
    }

    fn matched_pattern<'r>(resolution: &Resolution<'r>) -> Option<&'r str> {
        match resolution {
            Resolution::Found(found) => Some(found.pattern()),
            _ => None,
        }
    }

    // ── Registration ──────────────────────────────────────────────────────────

    #[test]
    fn builder_starts_empty() {
        let router = Router::builder().build();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
    }

    #[test]
    fn registration_keeps_order() {
        let mut builder = Router::builder();
        builder.handle("^/a", ok, &[]).unwrap();
        builder.post("^/b", ok).unwrap();
        builder.handle("^/c", ok, &[Method::Get, Method::Post]).unwrap();
        let router = builder.build();

        let patterns: Vec<_> = router.routes().map(Route::pattern).collect();
        assert_eq!(patterns, vec!["^/a", "^/b", "^/c"]);
        assert_eq!(router.routes().nth(1).map(Route::methods), Some(&[Method::Post][..]));
    }

    #[test]
    fn duplicate_pattern_is_rejected() {
        let mut builder = Router::builder();
        builder.handle("^/$", ok, &[]).unwrap();
        let err = builder.post("^/$", ok).unwrap_err();
        assert!(matches!(err, RouteError::Duplicate(p) if p == "^/$"));
        assert_eq!(builder.build().len(), 1);
    }

    #[test]
    fn pattern_errors_propagate() {
        let mut builder = Router::builder();
        let err = builder.handle("/<a>/<a>", ok, &[]).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Pattern(PatternError::DuplicateCapture { .. })
        ));
        let err = builder.handle("/<a>/<b", ok, &[]).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Pattern(PatternError::UnbalancedBrackets { .. })
        ));
        assert!(builder.build().is_empty());
    }

    #[test]
    fn router_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();
    }

    // ── Resolution ────────────────────────────────────────────────────────────

    #[test]
    fn empty_router_is_not_found() {
        let router = Router::builder().build();
        assert!(matches!(
            router.resolve(&Method::Get, "/"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn first_registered_match_wins() {
        let mut builder = Router::builder();
        builder.handle("^/foo/bar", ok, &[]).unwrap();
        builder.handle("foo", ok, &[]).unwrap();
        builder.handle("^/$", ok, &[]).unwrap();
        let router = builder.build();

        let cases = [
            ("/foo", Some("foo")),
            ("/a/b/c/fobar/d", None),
            ("/a/b/c/foobar/d", Some("foo")),
            ("foo/bar", Some("^/foo/bar")),
            ("/foo/bar", Some("^/foo/bar")),
            ("/barr", None),
            ("/", Some("^/$")),
        ];
        for (path, expected) in cases {
            let resolution = router.resolve(&Method::Get, path);
            assert_eq!(matched_pattern(&resolution), expected, "path {path}");
        }
    }

    #[test]
    fn earlier_route_shadows_later_one_on_shared_paths() {
        let mut builder = Router::builder();
        builder.handle("^/x", ok, &[]).unwrap();
        builder.handle("^/unrelated", ok, &[]).unwrap();
        builder.handle("^/(x|y)", ok, &[]).unwrap();
        let router = builder.build();

        assert_eq!(matched_pattern(&router.resolve(&Method::Get, "/x")), Some("^/x"));
        assert_eq!(
            matched_pattern(&router.resolve(&Method::Get, "/y")),
            Some("^/(x|y)")
        );
    }

    #[test]
    fn default_methods_allow_get_only() {
        let mut builder = Router::builder();
        builder.handle("^/nomethod-defaultget", ok, &[]).unwrap();
        let router = builder.build();

        assert!(router.resolve(&Method::Get, "/nomethod-defaultget").is_found());
        let post = router.resolve(&Method::Post, "/nomethod-defaultget");
        assert!(matches!(post, Resolution::MethodNotAllowed));
        assert_eq!(post.status(), Some(StatusCode::MethodNotAllowed));
    }

    #[test]
    fn later_route_can_allow_the_method() {
        let mut builder = Router::builder();
        builder.handle("^/items$", ok, &[]).unwrap();
        builder.post("^/item", ok).unwrap();
        let router = builder.build();

        assert_eq!(
            matched_pattern(&router.resolve(&Method::Post, "/items")),
            Some("^/item")
        );
        assert!(matches!(
            router.resolve(&Method::Delete, "/items"),
            Resolution::MethodNotAllowed
        ));
        assert!(matches!(
            router.resolve(&Method::Delete, "/other"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn captures_carry_converters() {
        let mut builder = Router::builder();
        builder.handle("^/blog/<int:blogID>", ok, &[]).unwrap();
        builder
            .handle("^/blog/<blogUID>/images/<int:imageID>/thumbnail", ok, &[])
            .unwrap();
        let router = builder.build();

        let descriptors = router.routes().nth(1).map(Route::captures).unwrap();
        assert_eq!(descriptors.get("blogUID"), Some(&Converter::Str));
        assert_eq!(descriptors.get("imageID"), Some(&Converter::Int));

        let Resolution::Found(found) = router.resolve(&Method::Get, "/blog/1234") else {
            panic!("expected a match");
        };
        let id = found.captures().get("blogID").unwrap();
        assert_eq!(id.converter(), Converter::Int);
        assert_eq!(id.as_i64(), Ok(1234));

        let Resolution::Found(found) =
            router.resolve(&Method::Get, "/blog/GjqzmwZ/images/2334/thumbnail")
        else {
            panic!("expected a match");
        };
        let captures = found.captures();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures.get("blogUID").unwrap().as_str(), "GjqzmwZ");
        assert_eq!(captures.get("blogUID").unwrap().converter(), Converter::Str);
        assert_eq!(captures.get("imageID").unwrap().as_u64(), Ok(2334));
    }

    #[test]
    fn pattern_without_tokens_yields_no_captures() {
        let mut builder = Router::builder();
        builder.handle(r"^/fo(o|bar)$", ok, &[]).unwrap();
        let router = builder.build();

        let Resolution::Found(found) = router.resolve(&Method::Get, "/fobar") else {
            panic!("expected a match");
        };
        assert!(found.captures().is_empty());
    }

    #[test]
    fn optional_token_that_did_not_participate_is_skipped() {
        let mut builder = Router::builder();
        builder.handle("^/page(/<int:n>)?$", ok, &[]).unwrap();
        let router = builder.build();

        let Resolution::Found(found) = router.resolve(&Method::Get, "/page") else {
            panic!("expected a match");
        };
        assert!(found.captures().get("n").is_none());
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut builder = Router::builder();
        builder.handle("^/p/<int:id>/<name>", ok, &[]).unwrap();
        let router = builder.build();

        let first = router.resolve(&Method::Get, "/p/9/ann");
        let second = router.resolve(&Method::Get, "/p/9/ann");
        match (first, second) {
            (Resolution::Found(a), Resolution::Found(b)) => {
                assert!(Arc::ptr_eq(a.handler(), b.handler()));
                assert_eq!(a.pattern(), b.pattern());
                assert_eq!(a.captures(), b.captures());
            }
            other => panic!("expected two matches, got {other:?}"),
        }
    }

    #[test]
    fn paths_are_normalized_before_matching() {
        let mut builder = Router::builder();
        builder.handle("^/a/c$", ok, &[]).unwrap();
        builder.handle("^/dir/$", ok, &[]).unwrap();
        let router = builder.build();

        assert!(router.resolve(&Method::Get, " /a/b/../c ").is_found());
        assert!(router.resolve(&Method::Get, "a//c").is_found());
        assert!(router.resolve(&Method::Get, "/dir/./").is_found());
        assert!(!router.resolve(&Method::Get, "/dir").is_found());
    }

    // ── Nesting ───────────────────────────────────────────────────────────────

    fn nested_router() -> Router {
        let mut api = Router::builder();
        api.handle("^/api/users$", ok, &[]).unwrap();
        api.post("^/api/upload$", ok).unwrap();
        api.build()
    }

    #[test]
    fn nested_router_matches_in_place() {
        let mut builder = Router::builder();
        builder.handle("^/api/users$", ok, &[Method::Delete]).unwrap();
        builder.nest("^/api", nested_router()).unwrap();
        builder.handle("^/api/", ok, &[]).unwrap();
        let router = builder.build();

        assert_eq!(router.len(), 3);
        assert!(router.routes().nth(1).is_some_and(Route::is_nested));

        // The outer DELETE route is not allowed for GET, the nested one is.
        let get = router.resolve(&Method::Get, "/api/users");
        assert_eq!(matched_pattern(&get), Some("^/api/users$"));

        // The mount point claims unmatched paths under it.
        assert!(matches!(
            router.resolve(&Method::Get, "/api/other"),
            Resolution::NotFound
        ));
        assert!(matches!(
            router.resolve(&Method::Get, "/api/upload"),
            Resolution::MethodNotAllowed
        ));
    }

    #[test]
    fn unclaimed_paths_fall_through_the_mount_point() {
        let mut builder = Router::builder();
        builder.nest("^/api$", nested_router()).unwrap();
        builder.handle("^/", ok, &[]).unwrap();
        let router = builder.build();

        assert_eq!(
            matched_pattern(&router.resolve(&Method::Get, "/apiary")),
            Some("^/")
        );
        // Mount point matches but only allows GET.
        assert!(matches!(
            router.resolve(&Method::Post, "/api"),
            Resolution::MethodNotAllowed
        ));
    }

    #[test]
    fn nested_wrong_method_is_reported() {
        let mut builder = Router::builder();
        builder.nest("^/api", nested_router()).unwrap();
        let router = builder.build();

        assert!(matches!(
            router.resolve(&Method::Get, "/api/upload"),
            Resolution::MethodNotAllowed
        ));
        assert!(router.resolve(&Method::Post, "/api/upload").is_found());
        assert!(matches!(
            router.resolve(&Method::Get, "/elsewhere"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn nest_pattern_counts_for_duplicates() {
        let mut builder = Router::builder();
        builder.nest("^/api", nested_router()).unwrap();
        assert!(matches!(
            builder.handle("^/api", ok, &[]),
            Err(RouteError::Duplicate(_))
        ));
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn route_dispatches_with_context() {
        let mut builder = Router::builder();
        let person = |ctx: Context| async move {
            match ctx.capture("id").map(Capture::as_i64) {
                Some(Ok(id)) => {
                    Response::new(StatusCode::Ok).body(format!("{} {id}", ctx.pattern()))
                }
                _ => Response::new(StatusCode::InternalServerError),
            }
        };
        builder.handle("^/person/<int:id>$", person, &[]).unwrap();
        let router = builder.build();

        let res = router.route(Request::new(Method::Get, "/person/42")).await;
        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.text(), Some("^/person/<int:id>$ 42"));

        let res = router.route(Request::new(Method::Get, "/person/42?verbose=1")).await;
        assert_eq!(res.text(), Some("^/person/<int:id>$ 42"));
    }

    #[tokio::test]
    async fn route_renders_fallbacks() {
        let mut builder = Router::builder();
        builder.post("^/postonly", echo_pattern).unwrap();
        let router = builder.build();

        let res = router.route(Request::new(Method::Get, "/postonly")).await;
        assert_eq!(res.status(), StatusCode::MethodNotAllowed);

        let res = router.route(Request::new(Method::Get, "/nowhere")).await;
        assert_eq!(res.status(), StatusCode::NotFound);
        assert_eq!(res.text(), Some("404 page not found\n"));

        let res = router.route(Request::new(Method::Post, "/postonly")).await;
        assert_eq!(res.text(), Some("^/postonly"));
    }

    #[tokio::test]
    async fn route_rejects_asterisk_target() {
        let mut builder = Router::builder();
        builder.handle(".*", ok, &[Method::Options]).unwrap();
        let router = builder.build();

        let res = router.route(Request::new(Method::Options, "*")).await;
        assert_eq!(res.status(), StatusCode::BadRequest);
        assert_eq!(res.headers().get("connection"), Some("close"));
    }

    #[tokio::test]
    async fn router_is_shareable_across_tasks() {
        let mut builder = Router::builder();
        builder.handle("^/n/<int:n>$", echo_pattern, &[]).unwrap();
        let router = Arc::new(builder.build());

        let mut tasks = Vec::new();
        for n in 0..8 {
            let router = Arc::clone(&router);
            tasks.push(tokio::spawn(async move {
                router
                    .route(Request::new(Method::Get, format!("/n/{n}")))
                    .await
                    .status()
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), StatusCode::Ok);
        }
    }
}
