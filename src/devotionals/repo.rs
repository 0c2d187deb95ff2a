use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::devotionals::dto::NewDevotional;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Devotional {
    pub id: Uuid,
    pub title: String,
    pub scripture: Option<String>,
    pub body: String,
    pub author: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Devotional>, ApiError> {
    let rows = sqlx::query_as::<_, Devotional>(
        r#"
        SELECT id, title, scripture, body, author, published_at, created_at, updated_at
        FROM devotionals
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Devotional>, ApiError> {
    let row = sqlx::query_as::<_, Devotional>(
        r#"
        SELECT id, title, scripture, body, author, published_at, created_at, updated_at
        FROM devotionals
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, devotional: &NewDevotional) -> Result<Devotional, ApiError> {
    let row = sqlx::query_as::<_, Devotional>(
        r#"
        INSERT INTO devotionals (title, scripture, body, author, published_at)
        VALUES ($1, $2, $3, $4, CASE WHEN $5 THEN now() END)
        RETURNING id, title, scripture, body, author, published_at, created_at, updated_at
        "#,
    )
    .bind(&devotional.title)
    .bind(&devotional.scripture)
    .bind(&devotional.body)
    .bind(&devotional.author)
    .bind(devotional.published)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Re-publishing keeps the original publish timestamp; unpublishing clears
/// it.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    devotional: &NewDevotional,
) -> Result<Option<Devotional>, ApiError> {
    let row = sqlx::query_as::<_, Devotional>(
        r#"
        UPDATE devotionals
        SET title = $2,
            scripture = $3,
            body = $4,
            author = $5,
            published_at = CASE WHEN $6 THEN COALESCE(published_at, now()) END,
            updated_at = now()
        WHERE id = $1
        RETURNING id, title, scripture, body, author, published_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&devotional.title)
    .bind(&devotional.scripture)
    .bind(&devotional.body)
    .bind(&devotional.author)
    .bind(devotional.published)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM devotionals WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
