use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use crate::db::entities::tool;
use crate::web::models::ToolPayload;

pub async fn get_all_tools(db: &DatabaseConnection) -> Result<Vec<tool::Model>, DbErr> {
    tool::Entity::find().all(db).await
}

pub async fn get_tool_by_id(
    db: &DatabaseConnection,
    tool_id: Uuid,
) -> Result<Option<tool::Model>, DbErr> {
    tool::Entity::find_by_id(tool_id).one(db).await
}

pub async fn get_tools_by_category(
    db: &DatabaseConnection,
    category: &str,
) -> Result<Vec<tool::Model>, DbErr> {
    tool::Entity::find()
        .filter(tool::Column::Category.eq(category))
        .all(db)
        .await
}

pub async fn get_featured_tools(db: &DatabaseConnection) -> Result<Vec<tool::Model>, DbErr> {
    tool::Entity::find()
        .filter(tool::Column::Featured.eq(true))
        .all(db)
        .await
}

/// Case-insensitive substring match against name or description.
/// Both sides are lowered so the query behaves the same on Postgres
/// and SQLite.
pub async fn search_tools(
    db: &DatabaseConnection,
    query: &str,
) -> Result<Vec<tool::Model>, DbErr> {
    let pattern = format!("%{}%", query.to_lowercase());
    tool::Entity::find()
        .filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(tool::Column::Name))).like(pattern.as_str()))
                .add(
                    Expr::expr(Func::lower(Expr::col(tool::Column::Description)))
                        .like(pattern.as_str()),
                ),
        )
        .all(db)
        .await
}

pub async fn create_tool(
    db: &DatabaseConnection,
    payload: ToolPayload,
) -> Result<tool::Model, DbErr> {
    let now = Utc::now();
    let new_tool = tool::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        category: Set(payload.category),
        url: Set(payload.url),
        github: Set(payload.github),
        image: Set(payload.image),
        pricing: Set(payload.pricing),
        rating: Set(payload.rating),
        featured: Set(payload.featured),
        daily_users: Set(payload.daily_users),
        model_type: Set(payload.model_type),
        ease_of_use: Set(payload.ease_of_use),
        code_quality: Set(payload.code_quality),
        user_experience: Set(payload.user_experience),
        last_updated: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
    };
    new_tool.insert(db).await
}

/// Overwrites every writable field of an existing tool. Returns
/// `Ok(None)` when no row with the given id exists; an update never
/// inserts.
pub async fn update_tool(
    db: &DatabaseConnection,
    tool_id: Uuid,
    payload: ToolPayload,
) -> Result<Option<tool::Model>, DbErr> {
    let existing = match tool::Entity::find_by_id(tool_id).one(db).await? {
        Some(model) => model,
        None => return Ok(None),
    };

    let now = Utc::now();
    let mut active: tool::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.description = Set(payload.description);
    active.category = Set(payload.category);
    active.url = Set(payload.url);
    active.github = Set(payload.github);
    active.image = Set(payload.image);
    active.pricing = Set(payload.pricing);
    active.rating = Set(payload.rating);
    active.featured = Set(payload.featured);
    active.daily_users = Set(payload.daily_users);
    active.model_type = Set(payload.model_type);
    active.ease_of_use = Set(payload.ease_of_use);
    active.code_quality = Set(payload.code_quality);
    active.user_experience = Set(payload.user_experience);
    active.last_updated = Set(now);
    active.updated_at = Set(now);

    active.update(db).await.map(Some)
}

/// Deletes a tool and, through the foreign keys, its dependent
/// favorites and reviews. Returns the number of tool rows removed.
pub async fn delete_tool(db: &DatabaseConnection, tool_id: Uuid) -> Result<u64, DbErr> {
    let result = tool::Entity::delete_many()
        .filter(tool::Column::Id.eq(tool_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
