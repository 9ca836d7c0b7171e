use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::server::config::ServerConfig;
use crate::services::auth_service;
use crate::web::{
    error::AppError,
    middleware::auth,
    models::{LoginRequest, RegisterRequest},
    routes::{admin_routes, tool_routes, user_routes},
};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub config: Arc<ServerConfig>,
}

async fn register_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<models::UserResponse>), AppError> {
    let user_response = auth_service::register_user(&app_state.db_pool, payload).await?;
    Ok((StatusCode::CREATED, Json(user_response)))
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let login_response =
        auth_service::login_user(&app_state.db_pool, payload, &app_state.config.jwt_secret).await?;

    let auth_cookie = Cookie::build(("token", login_response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    let mut response = Json(login_response).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        auth_cookie.to_string().parse().map_err(|_| {
            AppError::InternalServerError("Failed to encode session cookie".to_string())
        })?,
    );

    Ok(response)
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(db_pool: DatabaseConnection, config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState { db_pool, config });

    let allowed_origin = app_state
        .config
        .frontend_url
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:5173"));

    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_credentials(true);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .nest("/api/tools", tool_routes::create_tools_router())
        .nest(
            "/api/user",
            user_routes::create_user_router()
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth::auth,
                )),
        )
        // The later layer runs first: auth decodes the token, then
        // require_admin checks the stored role.
        .nest(
            "/api/admin",
            admin_routes::create_admin_router()
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth::require_admin,
                ))
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth::auth,
                )),
        )
        .with_state(app_state.clone())
        .layer(cors)
}
