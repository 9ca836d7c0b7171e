use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::entities::{review, tool};
use crate::db::services as db_services;
use crate::services::auth_service;
use crate::web::models::{AuthenticatedUser, ReviewRequest, UpdateProfileRequest, UserResponse};
use crate::web::{error::AppError, AppState};

async fn get_profile_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_services::get_user_by_id(&app_state.db_pool, authenticated_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse::from(user)))
}

async fn update_profile_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(AppError::InvalidInput(
            "A valid email address is required.".to_string(),
        ));
    }
    if payload.name.is_empty() {
        return Err(AppError::InvalidInput("Name must not be empty.".to_string()));
    }

    // An omitted or empty password leaves the stored hash untouched.
    let password_hash = match payload.password.as_deref() {
        Some(password) if !password.is_empty() => Some(auth_service::hash_password(password)?),
        _ => None,
    };

    let user = db_services::update_user(
        &app_state.db_pool,
        authenticated_user.id,
        payload.email,
        payload.name,
        password_hash,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

async fn get_favorites_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<tool::Model>>, AppError> {
    let tools = db_services::get_favorites(&app_state.db_pool, authenticated_user.id).await?;
    Ok(Json(tools))
}

async fn add_favorite_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(tool_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    db_services::add_favorite(&app_state.db_pool, authenticated_user.id, tool_id).await?;
    Ok(Json(serde_json::json!({ "message": "Tool added to favorites" })))
}

async fn remove_favorite_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(tool_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Rows affected is ignored: removing an absent favorite succeeds.
    db_services::remove_favorite(&app_state.db_pool, authenticated_user.id, tool_id).await?;
    Ok(Json(serde_json::json!({ "message": "Tool removed from favorites" })))
}

async fn add_review_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(tool_id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<review::Model>), AppError> {
    let review = db_services::add_review(
        &app_state.db_pool,
        authenticated_user.id,
        tool_id,
        payload.rating,
        payload.comment,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

pub fn create_user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/profile",
            get(get_profile_handler).put(update_profile_handler),
        )
        .route("/favorites", get(get_favorites_handler))
        .route(
            "/favorites/{id}",
            post(add_favorite_handler).delete(remove_favorite_handler),
        )
        .route("/tools/{id}/reviews", post(add_review_handler))
}
