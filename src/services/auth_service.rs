use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::db::entities::user;
use crate::db::enums::UserRole;
use crate::web::error::AppError;
use crate::web::models::{Claims, LoginRequest, LoginResponse, RegisterRequest, UserResponse};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::PasswordHashingError(e.to_string()))
}

pub async fn register_user(
    pool: &DatabaseConnection,
    req: RegisterRequest,
) -> Result<UserResponse, AppError> {
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::InvalidInput(
            "A valid email address is required.".to_string(),
        ));
    }
    if req.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Password must not be empty.".to_string(),
        ));
    }
    if req.name.is_empty() {
        return Err(AppError::InvalidInput("Name must not be empty.".to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    // No duplicate-email pre-check: the unique index on email surfaces a
    // concurrent or repeated registration as a store error.
    let now = Utc::now();
    let new_user = user::ActiveModel {
        email: Set(req.email),
        password_hash: Set(password_hash),
        name: Set(req.name),
        role: Set(UserRole::User),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let user_model = new_user
        .insert(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create user: {e}")))?;

    Ok(UserResponse::from(user_model))
}

pub async fn login_user(
    pool: &DatabaseConnection,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password must not be empty.".to_string(),
        ));
    }

    let user_model_option = user::Entity::find()
        .filter(user::Column::Email.eq(&req.email))
        .one(pool)
        .await
        .map_err(|e: DbErr| AppError::DatabaseError(format!("Failed to look up user: {e}")))?;

    // An unknown email and a wrong password produce the same error, so the
    // response does not reveal which check failed.
    let user = match user_model_option {
        Some(u) => u,
        None => return Err(AppError::InvalidCredentials),
    };

    let valid_password =
        verify(&req.password, &user.password_hash).map_err(|_| AppError::InvalidCredentials)?;

    if !valid_password {
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_user(&user, jwt_secret)
}

pub fn create_jwt_for_user(
    user: &user::Model,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    let now = Utc::now();
    // Tokens are valid for 24 hours.
    let expiration = (now + Duration::hours(24)).timestamp() as usize;

    let claims = Claims {
        sub: user.id.to_string(),
        user_id: user.id,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(e.to_string()))?;

    Ok(LoginResponse {
        token,
        user: UserResponse::from(user.clone()),
    })
}
