use axum::{
    Router,
    body::Body,
    extract::FromRef,
    http::{HeaderName, Request},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    LatencyUnit,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod session;
pub mod store;

// Module for routing segregation (Public, Protected, Admin, API).
pub mod routes;
use routes::{admin, api, protected, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use store::{FirestoreStore, MockDocumentStore, StoreState};

/// ApiDoc
///
/// OpenAPI documentation for the JSON endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::delete_ad_request, handlers::get_session),
    components(
        schemas(
            models::ErrorBody, models::DeleteSuccess,
            session::Session, session::Identity, session::Role,
        )
    ),
    tags(
        (name = "marketplace", description = "Marketplace portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable container shared by every request. Handlers hold no
/// other state, so any number of invocations can run in parallel.
#[derive(Clone)]
pub struct AppState {
    /// Remote document store client.
    pub store: StoreState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for StoreState {
    fn from_ref(app_state: &AppState) -> StoreState {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// create_router
///
/// Assembles the routing structure, applies the global middleware and registers
/// the application state.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(protected::protected_routes())
        .merge(admin::admin_routes())
        // Resource Proxy: carries its own CORS and panic layers.
        .merge(api::api_routes())
        .with_state(state);

    with_observability(router)
}

/// with_observability
///
/// Outermost stack: assign a request id unless the client sent one, open one span
/// per request, and echo the id back on the response.
fn with_observability(router: Router) -> Router {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    let on_response = DefaultOnResponse::new()
        .level(Level::INFO)
        .latency_unit(LatencyUnit::Millis);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(header.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_span)
                    .on_response(on_response),
            )
            .layer(PropagateRequestIdLayer::new(header)),
    )
}

/// Span for one request. Only the path is recorded, so query strings never reach
/// the logs.
fn request_span(request: &Request<Body>) -> Span {
    let req_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = request.uri().path(),
        req_id,
    )
}
