//! Integration tests for the service surface outside the catalog:
//! the health route and the router's not-found fallback.

mod common;

use axum::http::StatusCode;

use common::{create_test_app, send_request};

#[tokio::test]
async fn test_health_check_responds_ok() {
    let (app, _db) = create_test_app().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(axum::body::Body::empty())
        .expect("failed to build request");

    let response = tower::ServiceExt::oneshot(app.clone(), request)
        .await
        .expect("request should not fail at the transport level");
    assert_eq!(response.status(), StatusCode::OK);

    // Plain text body, not JSON.
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _db) = create_test_app().await;

    let (status, _) = send_request(&app, "GET", "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
