use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MediaResource {
    pub id: Uuid,
    pub title: String,
    pub kind: String,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub object_key: String, // internal blob reference, clients go through /media/:id/file
    pub content_type: String,
    pub size_bytes: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<MediaResource>, ApiError> {
    let rows = sqlx::query_as::<_, MediaResource>(
        r#"
        SELECT id, title, kind, description, object_key, content_type, size_bytes,
               created_at, updated_at
        FROM media_resources
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

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<MediaResource>, ApiError> {
    let row = sqlx::query_as::<_, MediaResource>(
        r#"
        SELECT id, title, kind, description, object_key, content_type, size_bytes,
               created_at, updated_at
        FROM media_resources
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert(
    db: &PgPool,
    title: &str,
    description: Option<&str>,
    kind: &str,
    object_key: &str,
    content_type: &str,
    size_bytes: i64,
) -> Result<MediaResource, ApiError> {
    let row = sqlx::query_as::<_, MediaResource>(
        r#"
        INSERT INTO media_resources (title, kind, description, object_key, content_type, size_bytes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, title, kind, description, object_key, content_type, size_bytes,
                  created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(kind)
    .bind(description)
    .bind(object_key)
    .bind(content_type)
    .bind(size_bytes)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_metadata(
    db: &PgPool,
    id: Uuid,
    title: &str,
    description: Option<&str>,
) -> Result<Option<MediaResource>, ApiError> {
    let row = sqlx::query_as::<_, MediaResource>(
        r#"
        UPDATE media_resources
        SET title = $2,
            description = $3,
            updated_at = now()
        WHERE id = $1
        RETURNING id, title, kind, description, object_key, content_type, size_bytes,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Removes the row and hands back the object key so the caller can clean up
/// the blob store.
pub async fn delete(db: &PgPool, id: Uuid) -> Result<Option<String>, ApiError> {
    let row: Option<(String,)> =
        sqlx::query_as("DELETE FROM media_resources WHERE id = $1 RETURNING object_key")
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(row.map(|r| r.0))
}
