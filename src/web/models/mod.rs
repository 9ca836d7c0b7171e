use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::entities::user;
use crate::db::enums::UserRole;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user record as it leaves the service; the password hash never
/// appears here.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: String,
    pub name: String,
    pub password: Option<String>,
}

/// Writable tool fields, bound from the admin create/update requests.
/// The identifier and all timestamps are server-assigned.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPayload {
    pub name: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub github: Option<String>,
    pub image: String,
    pub pricing: String,
    pub rating: f64,
    #[serde(default)]
    pub featured: bool,
    pub daily_users: String,
    pub model_type: String,
    pub ease_of_use: f64,
    pub code_quality: Option<f64>,
    pub user_experience: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

/// A review joined with its author.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithUser {
    pub id: i32,
    pub user_id: i32,
    pub tool_id: Uuid,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Option<UserResponse>,
}

// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject: the user id, as a string
    pub user_id: i32,
    pub exp: usize, // Expiration time (timestamp)
}

/// Authenticated caller details, passed as a request extension by the
/// auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
}
