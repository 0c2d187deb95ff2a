use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::events::dto::NewEvent;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn list(
    db: &PgPool,
    upcoming: bool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Event>, ApiError> {
    let rows = if upcoming {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, location, starts_at, ends_at, created_at, updated_at
            FROM events
            WHERE starts_at >= now()
            ORDER BY starts_at ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?
    } else {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, location, starts_at, ends_at, created_at, updated_at
            FROM events
            ORDER BY starts_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?
    };
    Ok(rows)
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Event>, ApiError> {
    let row = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, title, description, location, starts_at, ends_at, created_at, updated_at
        FROM events
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, event: &NewEvent) -> Result<Event, ApiError> {
    let row = sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (title, description, location, starts_at, ends_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, title, description, location, starts_at, ends_at, created_at, updated_at
        "#,
    )
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.location)
    .bind(event.starts_at)
    .bind(event.ends_at)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(db: &PgPool, id: Uuid, event: &NewEvent) -> Result<Option<Event>, ApiError> {
    let row = sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET title = $2,
            description = $3,
            location = $4,
            starts_at = $5,
            ends_at = $6,
            updated_at = now()
        WHERE id = $1
        RETURNING id, title, description, location, starts_at, ends_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.location)
    .bind(event.starts_at)
    .bind(event.ends_at)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
