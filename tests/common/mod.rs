//! Shared helpers for the integration test suite: an application router
//! backed by a fresh in-memory database, plus request plumbing.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot` method

use tooldex::db::entities::{tool, user};
use tooldex::db::enums::UserRole;
use tooldex::db::schema;
use tooldex::db::services;
use tooldex::server::config::ServerConfig;
use tooldex::web::create_axum_router;
use tooldex::web::models::{Claims, ToolPayload};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Builds the full application router against a fresh in-memory SQLite
/// database with the schema bootstrapped. The pool is capped at one
/// connection: a pooled `sqlite::memory:` would otherwise hand every
/// connection its own empty database.
pub async fn create_test_app() -> (Router, DatabaseConnection) {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1);

    let db_pool = Database::connect(opt)
        .await
        .expect("failed to open in-memory database");

    schema::bootstrap(&db_pool)
        .await
        .expect("failed to bootstrap schema");

    let config = Arc::new(ServerConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        frontend_url: "http://localhost:5173".to_string(),
    });

    let app = create_axum_router(db_pool.clone(), config);
    (app, db_pool)
}

/// Sends one request against a clone of the router and returns the
/// status together with the parsed JSON body (Null when empty).
pub async fn send_request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("failed to build request"),
        None => builder
            .body(Body::empty())
            .expect("failed to build request"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level");
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

pub async fn register(app: &Router, email: &str, password: &str, name: &str) -> (StatusCode, Value) {
    send_request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": password, "name": name })),
    )
    .await
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send_request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// Registers and logs in a fresh user, returning (user id, bearer token).
pub async fn register_and_login(
    app: &Router,
    email: &str,
    password: &str,
    name: &str,
) -> (i32, String) {
    let (status, _) = register(app, email, password, name).await;
    assert_eq!(status, StatusCode::CREATED, "registration should succeed");

    let (status, body) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK, "login should succeed");

    let user_id = body["user"]["id"].as_i64().expect("login body carries the user id") as i32;
    let token = body["token"]
        .as_str()
        .expect("login body carries a token")
        .to_string();
    (user_id, token)
}

pub async fn promote_to_admin(db: &DatabaseConnection, user_id: i32) {
    let user = user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .expect("user lookup failed")
        .expect("user to promote must exist");

    let mut active: user::ActiveModel = user.into();
    active.role = Set(UserRole::Admin);
    active.update(db).await.expect("failed to promote user");
}

/// Inserts a tool directly through the service layer.
pub async fn insert_tool(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
    category: &str,
    featured: bool,
) -> tool::Model {
    let payload = ToolPayload {
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        url: "https://example.com".to_string(),
        github: None,
        image: "https://example.com/logo.png".to_string(),
        pricing: "free".to_string(),
        rating: 4.5,
        featured,
        daily_users: "10k+".to_string(),
        model_type: "LLM".to_string(),
        ease_of_use: 4.0,
        code_quality: None,
        user_experience: 4.2,
    };

    services::create_tool(db, payload)
        .await
        .expect("failed to insert tool")
}

/// A complete tool payload for the admin API, as a JSON body.
pub fn tool_body(name: &str, description: &str, category: &str, featured: bool) -> Value {
    json!({
        "name": name,
        "description": description,
        "category": category,
        "url": "https://example.com",
        "image": "https://example.com/logo.png",
        "pricing": "freemium",
        "rating": 4.1,
        "featured": featured,
        "dailyUsers": "5k+",
        "modelType": "LLM",
        "easeOfUse": 3.9,
        "userExperience": 4.4
    })
}

/// Signs a token the way the server does, with a configurable expiry
/// offset so tests can produce already-expired credentials.
pub fn make_token(user_id: i32, expires_in_hours: i64) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        user_id,
        exp: (Utc::now() + Duration::hours(expires_in_hours)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_ref()),
    )
    .expect("failed to sign test token")
}
