use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::db::entities::{favorite, review, tool, user};

/// Creates the tables for all entities if they do not exist yet.
/// Parent tables first, so the join tables can reference them.
pub async fn bootstrap(db: &DatabaseConnection) -> Result<(), DbErr> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = vec![
        schema.create_table_from_entity(tool::Entity),
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(favorite::Entity),
        schema.create_table_from_entity(review::Entity),
    ];

    for mut statement in statements {
        statement.if_not_exists();
        db.execute(builder.build(&statement)).await?;
    }

    info!("Database schema is up to date.");
    Ok(())
}
