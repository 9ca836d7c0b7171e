//! Integration tests for registration, login and the authorization gate.
//!
//! These tests verify that:
//! - Register/login round-trips issue a token whose subject is the user id
//! - Both login failure modes return the identical error
//! - Expired, malformed and missing tokens are rejected before any handler
//! - The profile endpoints never expose a password field
//! - A profile update cannot change the caller's role

mod common;

use axum::http::StatusCode;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::json;

use common::{
    create_test_app, login, make_token, register, register_and_login, send_request, tool_body,
    TEST_JWT_SECRET,
};
use tooldex::web::models::Claims;

#[tokio::test]
async fn test_register_login_profile_flow() {
    let (app, _db) = create_test_app().await;

    let (status, body) = register(&app, "a@x.com", "secret1", "Ada").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["role"], "user");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let (status, body) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("login returns a token");
    let user_id = body["user"]["id"].as_i64().expect("login returns the user");

    // The token's subject is the created user's identifier.
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(TEST_JWT_SECRET.as_ref()),
        &Validation::default(),
    )
    .expect("issued token must validate");
    assert_eq!(decoded.claims.sub, user_id.to_string());
    assert_eq!(decoded.claims.user_id as i64, user_id);

    let (status, body) = send_request(&app, "GET", "/api/user/profile", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["name"], "Ada");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (app, _db) = create_test_app().await;

    let (status, _) = register(&app, "a@x.com", "secret1", "Ada").await;
    assert_eq!(status, StatusCode::CREATED);

    let (wrong_password_status, wrong_password_body) = login(&app, "a@x.com", "wrong").await;
    let (unknown_email_status, unknown_email_body) = login(&app, "nobody@x.com", "secret1").await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email_status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password_body, unknown_email_body,
        "both failure modes must return the identical body"
    );
    assert_eq!(wrong_password_body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let (app, _db) = create_test_app().await;

    let (user_id, _) = register_and_login(&app, "a@x.com", "secret1", "Ada").await;

    let expired = make_token(user_id, -25);
    let (status, _) = send_request(&app, "GET", "/api/user/profile", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_or_missing_token_is_rejected() {
    let (app, _db) = create_test_app().await;

    let (status, _) =
        send_request(&app, "GET", "/api/user/profile", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_request(&app, "GET", "/api/user/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_token_is_accepted() {
    let (app, _db) = create_test_app().await;

    let (_, token) = register_and_login(&app, "a@x.com", "secret1", "Ada").await;

    // Same token, delivered through the session cookie instead of the
    // Authorization header.
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/user/profile")
        .header("Cookie", format!("token={token}"))
        .body(axum::body::Body::empty())
        .expect("failed to build request");

    let response = tower::ServiceExt::oneshot(app.clone(), request)
        .await
        .expect("request should not fail at the transport level");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let (app, _db) = create_test_app().await;

    let (status, _) = register(&app, "", "secret1", "Ada").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&app, "not-an-email", "secret1", "Ada").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&app, "a@x.com", "", "Ada").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&app, "a@x.com", "secret1", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_email_registration_fails() {
    let (app, _db) = create_test_app().await;

    let (status, _) = register(&app, "a@x.com", "secret1", "Ada").await;
    assert_eq!(status, StatusCode::CREATED);

    // The unique index on email turns the second insert into a store error.
    let (status, body) = register(&app, "a@x.com", "other-pass", "Imposter").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_profile_update_changes_email_and_password() {
    let (app, _db) = create_test_app().await;

    let (_, token) = register_and_login(&app, "a@x.com", "secret1", "Ada").await;

    let (status, body) = send_request(
        &app,
        "PUT",
        "/api/user/profile",
        Some(&token),
        Some(json!({ "email": "b@x.com", "name": "Ada L.", "password": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "b@x.com");
    assert_eq!(body["name"], "Ada L.");

    // The old credentials stop working, the new ones take over.
    let (status, _) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = login(&app, "b@x.com", "secret1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = login(&app, "b@x.com", "secret2").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_update_keeps_password_when_omitted() {
    let (app, _db) = create_test_app().await;

    let (_, token) = register_and_login(&app, "a@x.com", "secret1", "Ada").await;

    let (status, _) = send_request(
        &app,
        "PUT",
        "/api/user/profile",
        Some(&token),
        Some(json!({ "email": "a@x.com", "name": "Ada Lovelace" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_update_cannot_change_role() {
    let (app, _db) = create_test_app().await;

    let (_, token) = register_and_login(&app, "a@x.com", "secret1", "Ada").await;

    // The update payload has no role binding, so a smuggled role field
    // is dropped on deserialization and the stored role stays "user".
    let (status, body) = send_request(
        &app,
        "PUT",
        "/api/user/profile",
        Some(&token),
        Some(json!({ "email": "a@x.com", "name": "Ada", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "user");

    let (status, body) = send_request(&app, "GET", "/api/user/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "user");

    // The caller still cannot reach the admin routes.
    let (status, _) = send_request(
        &app,
        "POST",
        "/api/admin/tools",
        Some(&token),
        Some(tool_body("Denied", "Should not be created", "misc", false)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
