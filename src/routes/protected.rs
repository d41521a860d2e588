use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Protected Router Module
///
/// Pages for signed-in visitors. Anonymous visitors are redirected to `/login`;
/// visitors whose role a page does not permit are redirected to their own
/// landing page.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // GET /browse
        // Marketplace browsing, any signed-in role.
        .route("/browse", get(handlers::browse_page))
        // GET /seller
        // Seller dashboard, 'seller' only.
        .route("/seller", get(handlers::seller_page))
}
