use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without a session. `/login` is public-only: the gate
/// redirects signed-in visitors away from it.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the hosting platform.
        .route("/health", get(|| async { "ok" }))
        // GET /login
        // Public-only page. Signed-in visitors land on /admin, /seller or /browse.
        .route("/login", get(handlers::login_page))
        // GET /me
        // The resolved session in the `{ user, loading }` shape the browser uses.
        .route("/me", get(handlers::get_session))
}
