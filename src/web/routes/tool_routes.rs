use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::entities::tool;
use crate::db::services as db_services;
use crate::web::models::{ReviewWithUser, UserResponse};
use crate::web::{error::AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

async fn list_tools_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<tool::Model>>, AppError> {
    let tools = db_services::get_all_tools(&app_state.db_pool).await?;
    Ok(Json(tools))
}

async fn featured_tools_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<tool::Model>>, AppError> {
    let tools = db_services::get_featured_tools(&app_state.db_pool).await?;
    Ok(Json(tools))
}

async fn tools_by_category_handler(
    State(app_state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<tool::Model>>, AppError> {
    let tools = db_services::get_tools_by_category(&app_state.db_pool, &category).await?;
    Ok(Json(tools))
}

async fn search_tools_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<tool::Model>>, AppError> {
    // An absent or empty query matches everything, like an unfiltered list.
    let query = params.q.unwrap_or_default();
    let tools = db_services::search_tools(&app_state.db_pool, &query).await?;
    Ok(Json(tools))
}

async fn get_tool_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tool_id): Path<Uuid>,
) -> Result<Json<tool::Model>, AppError> {
    let tool = db_services::get_tool_by_id(&app_state.db_pool, tool_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tool not found".to_string()))?;
    Ok(Json(tool))
}

async fn tool_reviews_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tool_id): Path<Uuid>,
) -> Result<Json<Vec<ReviewWithUser>>, AppError> {
    let reviews = db_services::get_tool_reviews(&app_state.db_pool, tool_id).await?;

    let reviews = reviews
        .into_iter()
        .map(|(review, reviewer)| ReviewWithUser {
            id: review.id,
            user_id: review.user_id,
            tool_id: review.tool_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            updated_at: review.updated_at,
            user: reviewer.map(UserResponse::from),
        })
        .collect();

    Ok(Json(reviews))
}

pub fn create_tools_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tools_handler))
        .route("/featured", get(featured_tools_handler))
        .route("/category/{category}", get(tools_by_category_handler))
        .route("/search", get(search_tools_handler))
        .route("/{id}", get(get_tool_handler))
        .route("/{id}/reviews", get(tool_reviews_handler))
}
