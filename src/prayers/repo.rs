use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::prayers::dto::NewPrayerRequest;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PrayerRequest {
    pub id: Uuid,
    pub requester: String,
    pub request: String,
    pub contact: Option<String>,
    pub answered: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<PrayerRequest>, ApiError> {
    let rows = sqlx::query_as::<_, PrayerRequest>(
        r#"
        SELECT id, requester, request, contact, answered, created_at, updated_at
        FROM prayer_requests
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

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<PrayerRequest>, ApiError> {
    let row = sqlx::query_as::<_, PrayerRequest>(
        r#"
        SELECT id, requester, request, contact, answered, created_at, updated_at
        FROM prayer_requests
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, request: &NewPrayerRequest) -> Result<PrayerRequest, ApiError> {
    let row = sqlx::query_as::<_, PrayerRequest>(
        r#"
        INSERT INTO prayer_requests (requester, request, contact)
        VALUES ($1, $2, $3)
        RETURNING id, requester, request, contact, answered, created_at, updated_at
        "#,
    )
    .bind(&request.requester)
    .bind(&request.request)
    .bind(&request.contact)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn toggle_answered(db: &PgPool, id: Uuid) -> Result<Option<PrayerRequest>, ApiError> {
    let row = sqlx::query_as::<_, PrayerRequest>(
        r#"
        UPDATE prayer_requests
        SET answered = NOT answered,
            updated_at = now()
        WHERE id = $1
        RETURNING id, requester, request, contact, answered, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM prayer_requests WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
