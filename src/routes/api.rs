use crate::{AppState, error::ProxyError, handlers};
use axum::{
    Router,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::any,
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_CREDENTIALS: &str = "true";
pub const ALLOW_METHODS: &str = "GET,OPTIONS,DELETE";
pub const ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// API Router Module
///
/// The Resource Proxy surface. Every route is registered for every method so the
/// proxy decides between `200`, `400`, `405` and `500` itself.
///
/// Layer order (outermost first):
/// 1. CORS headers, overriding whatever the handler set. `tower_http::cors`
///    refuses a wildcard origin together with credentials, so the fixed header
///    set is written directly.
/// 2. Panic catcher, turning a panic into a JSON `500` that still receives the
///    CORS headers from (1).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // /api/ad-requests/{id}
        // DELETE removes the remote document; OPTIONS is the CORS preflight.
        .route("/api/ad-requests/{id}", any(handlers::delete_ad_request))
        // /api/ad-requests and /api/ad-requests/
        // No id: preflight succeeds, everything else is a 400.
        .route("/api/ad-requests", any(handlers::ad_request_collection))
        .route("/api/ad-requests/", any(handlers::ad_request_collection))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static(ALLOW_ORIGIN),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static(ALLOW_CREDENTIALS),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(ALLOW_METHODS),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(ALLOW_HEADERS),
                ))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

/// Converts a handler panic into the same JSON error shape as any other failure.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        String::new()
    };
    ProxyError::unexpected(message).into_response()
}
