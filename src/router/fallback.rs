//! Responses for requests the router cannot hand to a route.
//!
//! Each error body is rendered in the format the request declared in its
//! `Content-Type` header: JSON, HTML, or plain text otherwise.
//!
//! | Format | Body                                          |
//! |--------|-----------------------------------------------|
//! | JSON   | `{"error":"404 page not found","code":"404"}` |
//! | HTML   | `<html><body><h3>404 page not found</h3></body></html>` |
//! | Plain  | `404 page not found`                          |
//!
//! The functions taking a [`Context`] can be registered as ordinary handlers.

use serde::Serialize;

use crate::context::Context;
use crate::http::headers::{CONNECTION, X_CONTENT_TYPE_OPTIONS};
use crate::http::{ContentType, Request, Response, StatusCode};

const NOT_FOUND: &str = "404 page not found";
const METHOD_NOT_ALLOWED: &str = "405 method not allowed";
const INTERNAL_ERROR: &str = "500 internal server error";
const BAD_REQUEST: &str = "400 bad request";

#[derive(Serialize)]
struct ErrorDoc<'a> {
    error: &'a str,
    code: String,
}

/// Render `message` with `status` in the format negotiated from `request`.
pub fn error_response(request: &Request, status: StatusCode, message: &str) -> Response {
    let content_type = ContentType::negotiate(request.content_type());

    let mut payload = match content_type {
        ContentType::Json => serde_json::to_string(&ErrorDoc {
            error: message,
            code: status.as_u16().to_string(),
        })
        .unwrap_or_else(|_| message.to_owned()),
        ContentType::Html => format!("<html><body><h3>{message}</h3></body></html>"),
        ContentType::Plain | ContentType::Binary => message.to_owned(),
    };
    payload.push('\n');

    Response::new(status)
        .content_type(content_type)
        .header(X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(payload)
}

/// `404 page not found`.
pub async fn not_found(ctx: Context) -> Response {
    not_found_response(ctx.request())
}

/// `405 method not allowed`.
pub async fn method_not_allowed(ctx: Context) -> Response {
    method_not_allowed_response(ctx.request())
}

/// `500 internal server error`, for handlers that fail after routing.
pub async fn internal_error(ctx: Context) -> Response {
    error_response(
        ctx.request(),
        StatusCode::InternalServerError,
        INTERNAL_ERROR,
    )
}

pub(crate) fn not_found_response(request: &Request) -> Response {
    error_response(request, StatusCode::NotFound, NOT_FOUND)
}

pub(crate) fn method_not_allowed_response(request: &Request) -> Response {
    error_response(request, StatusCode::MethodNotAllowed, METHOD_NOT_ALLOWED)
}

// The `*` request target is only meaningful for server-wide OPTIONS.
pub(crate) fn asterisk_target_response(request: &Request) -> Response {
    error_response(request, StatusCode::BadRequest, BAD_REQUEST).header(CONNECTION, "close")
}
