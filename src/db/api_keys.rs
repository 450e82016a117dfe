//! Database operations for API keys using SeaORM.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::api_key;
use crate::error::{AppError, AppResult};
use crate::models::ApiKey;

/// Insert a new API key.
pub async fn insert_api_key<C: ConnectionTrait>(db: &C, key: &ApiKey) -> AppResult<()> {
    let id = Uuid::parse_str(&key.id)?;

    let model = api_key::ActiveModel {
        id: Set(id),
        key_hash: Set(key.key_hash.clone()),
        key_prefix: Set(key.key_prefix.clone()),
        name: Set(key.name.clone()),
        role: Set(key.role.clone()),
        expires_at: Set(key.expires_at),
        last_used_at: Set(key.last_used_at),
        created_at: Set(key.created_at),
        deleted_at: Set(key.deleted_at),
    };

    api_key::Entity::insert(model)
        .exec(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert API key: {}", e)))?;

    Ok(())
}

/// Find an API key by its hash.
pub async fn find_by_hash<C: ConnectionTrait>(db: &C, key_hash: &str) -> AppResult<Option<ApiKey>> {
    let result = api_key::Entity::find()
        .filter(api_key::Column::KeyHash.eq(key_hash))
        .one(db)
        .await?;

    Ok(result.map(ApiKey::from))
}

/// Update last used timestamp.
pub async fn update_last_used<C: ConnectionTrait>(db: &C, id: &str) -> AppResult<()> {
    let Ok(uuid) = Uuid::parse_str(id) else {
        return Ok(());
    };

    api_key::Entity::update_many()
        .col_expr(api_key::Column::LastUsedAt, Expr::value(Some(Utc::now())))
        .filter(api_key::Column::Id.eq(uuid))
        .exec(db)
        .await?;

    Ok(())
}

/// List all API keys (including revoked).
pub async fn list_all<C: ConnectionTrait>(db: &C) -> AppResult<Vec<ApiKey>> {
    let results = api_key::Entity::find()
        .order_by_desc(api_key::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(results.into_iter().map(ApiKey::from).collect())
}

/// Revoke an API key (soft delete). `false` when missing or already revoked.
pub async fn revoke<C: ConnectionTrait>(db: &C, id: &str) -> AppResult<bool> {
    let Ok(uuid) = Uuid::parse_str(id) else {
        return Ok(false);
    };

    let result = api_key::Entity::update_many()
        .col_expr(api_key::Column::DeletedAt, Expr::value(Some(Utc::now())))
        .filter(api_key::Column::Id.eq(uuid))
        .filter(api_key::Column::DeletedAt.is_null())
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}
