use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::sync::Arc;
use tracing::warn;

use crate::db::services as db_services;
use crate::web::models::{AuthenticatedUser, Claims};
use crate::web::{error::AppError, AppState};

pub async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let jwt_secret = &state.config.jwt_secret;

    // Try to get the token from the Authorization header first, then fall
    // back to the session cookie.
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| jar.get("token").map(|c| c.value().to_string()))
        .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!(error = ?e, "Rejected request carrying an invalid or expired token.");
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let authenticated_user = AuthenticatedUser {
        id: token_data.claims.user_id,
    };
    req.extensions_mut().insert(authenticated_user);
    Ok(next.run(req).await)
}

/// Gate for the admin routes. Runs after `auth` and checks the caller's
/// stored role, not anything inside the token.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let authenticated_user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

    let user = db_services::get_user_by_id(&state.db_pool, authenticated_user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

    if !user.role.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}
