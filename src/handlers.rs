use crate::{
    auth::SessionSnapshot,
    error::ProxyError,
    gate::{self, GuardDecision, RoutePolicy},
    models::{DeleteSuccess, ErrorBody},
    session::{Role, Session},
    store::{DocumentStore, StoreState},
};
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};

/// Remote collection backing `/api/ad-requests`.
pub const AD_REQUESTS_COLLECTION: &str = "adRequests";

// --- Resource Proxy ---

/// proxy_ad_request
///
/// The whole proxy contract for one invocation, independent of axum extraction:
/// 1. `OPTIONS` short-circuits with an empty `200`, whatever the id.
/// 2. A missing or blank id is rejected with `400` before the store is touched.
/// 3. `DELETE` performs exactly one remote delete; every other method is `405`.
///
/// CORS headers are attached by the router layer, so they are present on every
/// outcome including errors.
pub async fn proxy_ad_request(
    store: &dyn DocumentStore,
    method: &Method,
    id: Option<&str>,
) -> Result<Response, ProxyError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    // Blank ids are rejected; anything else reaches the store verbatim.
    let id = id
        .filter(|id| !id.trim().is_empty())
        .ok_or(ProxyError::MissingId)?;

    if method != Method::DELETE {
        return Err(ProxyError::MethodNotAllowed(method.to_string()));
    }

    store.delete_document(AD_REQUESTS_COLLECTION, id).await?;
    tracing::info!(id, "ad request deleted");

    Ok((StatusCode::OK, Json(DeleteSuccess::ok())).into_response())
}

/// delete_ad_request
///
/// [Public API] `/api/ad-requests/{id}`, registered for every method so the proxy
/// itself answers `405` and preflight requests.
///
/// *Note*: No caller authorization happens here; the only credential involved is
/// the server-held API key used towards the document store.
#[utoipa::path(
    delete,
    path = "/api/ad-requests/{id}",
    params(("id" = String, Path, description = "Ad request document id")),
    responses(
        (status = 200, description = "Deleted", body = DeleteSuccess),
        (status = 400, description = "Missing id", body = ErrorBody),
        (status = 405, description = "Method not allowed", body = ErrorBody),
        (status = 500, description = "Remote failure", body = ErrorBody)
    )
)]
pub async fn delete_ad_request(
    State(store): State<StoreState>,
    method: Method,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    // An undecodable segment is treated like an absent id.
    let id = id.ok().map(|Path(id)| id);
    proxy_ad_request(store.as_ref(), &method, id.as_deref())
        .await
        .into_response()
}

/// ad_request_collection
///
/// [Public API] `/api/ad-requests` without an id. Only preflight succeeds here.
pub async fn ad_request_collection(State(store): State<StoreState>, method: Method) -> Response {
    proxy_ad_request(store.as_ref(), &method, None)
        .await
        .into_response()
}

// --- Guarded Pages ---

/// render_guarded
///
/// Applies a gate decision to a page: the page itself, a `303` redirect, or the
/// loader placeholder.
fn render_guarded(decision: GuardDecision, title: &str) -> Response {
    match decision {
        GuardDecision::Render => Html(page(title)).into_response(),
        GuardDecision::Redirect(target) => Redirect::to(target).into_response(),
        GuardDecision::ShowLoader => Html(page("Loading…")).into_response(),
    }
}

fn page(title: &str) -> String {
    format!(
        "<!doctype html><html><head><title>{title}</title></head><body><main><h1>{title}</h1></main></body></html>"
    )
}

/// login_page
///
/// [Public-only Page] Signed-in visitors are sent to their landing page.
pub async fn login_page(SessionSnapshot(session): SessionSnapshot) -> Response {
    render_guarded(gate::decide_public_only(&session), "Sign in")
}

/// admin_page
///
/// [Protected Page] Admin dashboard.
pub async fn admin_page(SessionSnapshot(session): SessionSnapshot) -> Response {
    let policy = RoutePolicy::only(&[Role::Admin]);
    render_guarded(gate::decide_protected(&session, &policy), "Admin dashboard")
}

/// seller_page
///
/// [Protected Page] Seller listings.
pub async fn seller_page(SessionSnapshot(session): SessionSnapshot) -> Response {
    let policy = RoutePolicy::only(&[Role::Seller]);
    render_guarded(gate::decide_protected(&session, &policy), "Seller dashboard")
}

/// browse_page
///
/// [Protected Page] Marketplace browsing, open to every signed-in role.
pub async fn browse_page(SessionSnapshot(session): SessionSnapshot) -> Response {
    render_guarded(
        gate::decide_protected(&session, &RoutePolicy::any_authenticated()),
        "Browse listings",
    )
}

/// get_session
///
/// Returns the resolved `{ user, loading }` session. Anonymous visitors get an
/// anonymous session, not an error.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Current session", body = Session))
)]
pub async fn get_session(SessionSnapshot(session): SessionSnapshot) -> Json<Session> {
    Json(session)
}
