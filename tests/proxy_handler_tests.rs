use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use marketplace_portal::{
    AppConfig, AppState, REQUEST_ID_HEADER, create_router,
    models::{DeleteSuccess, ErrorBody},
    store::{MockDocumentStore, MockOutcome, StoreState},
};
use std::sync::Arc;
use tower::util::ServiceExt;

fn app(store: Arc<MockDocumentStore>) -> axum::Router {
    let state = AppState {
        store: store as StoreState,
        config: AppConfig::default(),
    };
    create_router(state)
}

async fn send(router: axum::Router, method: Method, uri: &str) -> axum::response::Response {
    router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn assert_cors_headers(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET,OPTIONS,DELETE"
    );
    let allow_headers = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap();
    assert!(allow_headers.contains("Content-Type"));
    assert!(allow_headers.contains("X-Requested-With"));
}

#[tokio::test]
async fn test_delete_success_returns_success_true() {
    let store = Arc::new(MockDocumentStore::new());
    let response = send(app(store.clone()), Method::DELETE, "/api/ad-requests/req-42").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);

    let body = body_bytes(response).await;
    assert_eq!(body, br#"{"success":true}"#);
    let parsed: DeleteSuccess = serde_json::from_slice(&body).unwrap();
    assert!(parsed.success);
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_remote_failure_returns_500_with_error() {
    let store = Arc::new(MockDocumentStore::new_failing());
    let response = send(app(store.clone()), Method::DELETE, "/api/ad-requests/req-42").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers(&response);

    let body: ErrorBody = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!body.error.is_empty());
    // Remote details stay server-side.
    assert!(!body.error.contains("Simulation"));
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_transport_failure_carries_message() {
    let store = Arc::new(MockDocumentStore::with_outcome(MockOutcome::TransportFailure(
        "connection reset by peer".to_string(),
    )));
    let response = send(app(store), Method::DELETE, "/api/ad-requests/req-42").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.error, "connection reset by peer");
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() {
    let store = Arc::new(MockDocumentStore::new());
    for method in [Method::GET, Method::POST, Method::PUT, Method::PATCH] {
        let response = send(app(store.clone()), method.clone(), "/api/ad-requests/req-42").await;
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{method} should be rejected"
        );
        assert_cors_headers(&response);
        let body: ErrorBody = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(!body.error.is_empty());
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_missing_id_is_rejected_before_remote_call() {
    let store = Arc::new(MockDocumentStore::new());
    for uri in ["/api/ad-requests", "/api/ad-requests/", "/api/ad-requests/%20"] {
        for method in [Method::DELETE, Method::GET, Method::POST] {
            let response = send(app(store.clone()), method, uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_cors_headers(&response);
        }
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_preflight_always_succeeds_with_cors_headers() {
    let store = Arc::new(MockDocumentStore::new());
    for uri in [
        "/api/ad-requests/req-42",
        "/api/ad-requests",
        "/api/ad-requests/",
    ] {
        let response = send(app(store.clone()), Method::OPTIONS, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_cors_headers(&response);
        assert!(body_bytes(response).await.is_empty());
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_repeated_delete_terminates_both_times() {
    let store = Arc::new(MockDocumentStore::new());
    let router = app(store.clone());

    let first = send(router.clone(), Method::DELETE, "/api/ad-requests/dup").await;
    let second = send(router, Method::DELETE, "/api/ad-requests/dup").await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let store = Arc::new(MockDocumentStore::new());
    let response = send(app(store), Method::OPTIONS, "/api/ad-requests/x").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_client_request_id_is_kept() {
    let store = Arc::new(MockDocumentStore::new());
    let response = app(store)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/ad-requests/x")
                .header(REQUEST_ID_HEADER, "client-trace-7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "client-trace-7");
}

#[tokio::test]
async fn test_padded_id_is_deleted_as_sent() {
    let store = Arc::new(MockDocumentStore::new());
    let router = app(store.clone());

    let padded = send(router.clone(), Method::DELETE, "/api/ad-requests/%20abc%20").await;
    let plain = send(router, Method::DELETE, "/api/ad-requests/abc").await;

    // Distinct documents: neither delete is a repeat of the other.
    assert_eq!(padded.status(), StatusCode::OK);
    assert_eq!(plain.status(), StatusCode::OK);
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn test_panic_in_store_becomes_json_500() {
    let store = Arc::new(MockDocumentStore::with_outcome(MockOutcome::Panic(
        "store exploded".to_string(),
    )));
    let response = send(app(store.clone()), Method::DELETE, "/api/ad-requests/req-42").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers(&response);
    let body: ErrorBody = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.error, "store exploded");
    assert_eq!(store.calls(), 1);
}
