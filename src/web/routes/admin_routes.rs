use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::entities::tool;
use crate::db::services as db_services;
use crate::web::models::ToolPayload;
use crate::web::{error::AppError, AppState};

async fn create_tool_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ToolPayload>,
) -> Result<(StatusCode, Json<tool::Model>), AppError> {
    let tool = db_services::create_tool(&app_state.db_pool, payload).await?;
    Ok((StatusCode::CREATED, Json(tool)))
}

async fn update_tool_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tool_id): Path<Uuid>,
    Json(payload): Json<ToolPayload>,
) -> Result<Json<tool::Model>, AppError> {
    let tool = db_services::update_tool(&app_state.db_pool, tool_id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Tool not found".to_string()))?;
    Ok(Json(tool))
}

async fn delete_tool_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tool_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let rows_affected = db_services::delete_tool(&app_state.db_pool, tool_id).await?;

    if rows_affected > 0 {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Tool not found".to_string()))
    }
}

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tools", post(create_tool_handler))
        .route(
            "/tools/{id}",
            put(update_tool_handler).delete(delete_tool_handler),
        )
}
