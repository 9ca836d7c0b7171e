use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::entities::{favorite, review, tool, user};

pub async fn get_user_by_id(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(user_id).one(db).await
}

/// Overwrites the caller-editable profile fields. The password hash is
/// only replaced when a new one is supplied; the role is not touched
/// here at all. Returns `Ok(None)` when the user no longer exists.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i32,
    email: String,
    name: String,
    password_hash: Option<String>,
) -> Result<Option<user::Model>, DbErr> {
    let existing = match user::Entity::find_by_id(user_id).one(db).await? {
        Some(model) => model,
        None => return Ok(None),
    };

    let mut active: user::ActiveModel = existing.into();
    active.email = Set(email);
    active.name = Set(name);
    if let Some(hash) = password_hash {
        active.password_hash = Set(hash);
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await.map(Some)
}

pub async fn add_favorite(
    db: &DatabaseConnection,
    user_id: i32,
    tool_id: Uuid,
) -> Result<favorite::Model, DbErr> {
    let new_favorite = favorite::ActiveModel {
        user_id: Set(user_id),
        tool_id: Set(tool_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_favorite.insert(db).await
}

/// Deletes every favorite matching the (user, tool) pair. Zero rows
/// affected is not an error, so a repeated removal succeeds.
pub async fn remove_favorite(
    db: &DatabaseConnection,
    user_id: i32,
    tool_id: Uuid,
) -> Result<u64, DbErr> {
    let result = favorite::Entity::delete_many()
        .filter(favorite::Column::UserId.eq(user_id))
        .filter(favorite::Column::ToolId.eq(tool_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// The tools the user has favorited, one entry per favorite row, so a
/// tool favorited twice shows up twice.
pub async fn get_favorites(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<tool::Model>, DbErr> {
    let favorites = favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    if favorites.is_empty() {
        return Ok(Vec::new());
    }

    let tool_ids: Vec<Uuid> = favorites.iter().map(|f| f.tool_id).collect();
    let tool_map: HashMap<Uuid, tool::Model> = tool::Entity::find()
        .filter(tool::Column::Id.is_in(tool_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    Ok(favorites
        .into_iter()
        .filter_map(|f| tool_map.get(&f.tool_id).cloned())
        .collect())
}

pub async fn add_review(
    db: &DatabaseConnection,
    user_id: i32,
    tool_id: Uuid,
    rating: f64,
    comment: String,
) -> Result<review::Model, DbErr> {
    let now = Utc::now();
    let new_review = review::ActiveModel {
        user_id: Set(user_id),
        tool_id: Set(tool_id),
        rating: Set(rating),
        comment: Set(comment),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    new_review.insert(db).await
}

/// All reviews for a tool, each paired with its author when the author
/// still exists.
pub async fn get_tool_reviews(
    db: &DatabaseConnection,
    tool_id: Uuid,
) -> Result<Vec<(review::Model, Option<user::Model>)>, DbErr> {
    let reviews = review::Entity::find()
        .filter(review::Column::ToolId.eq(tool_id))
        .all(db)
        .await?;

    if reviews.is_empty() {
        return Ok(Vec::new());
    }

    let user_ids: Vec<i32> = reviews.iter().map(|r| r.user_id).collect();
    let user_map: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(reviews
        .into_iter()
        .map(|review| {
            let author = user_map.get(&review.user_id).cloned();
            (review, author)
        })
        .collect())
}
