use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Pages exclusive to the 'admin' role. Other roles are sent back to their own
/// landing page rather than shown a 403.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        // Admin dashboard.
        .route("/admin", get(handlers::admin_page))
}
