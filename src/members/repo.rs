use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::members::dto::NewMember;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Member>, ApiError> {
    let rows = sqlx::query_as::<_, Member>(
        r#"
        SELECT id, name, email, phone, address, status, created_at, updated_at
        FROM members
        ORDER BY name ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Member>, ApiError> {
    let row = sqlx::query_as::<_, Member>(
        r#"
        SELECT id, name, email, phone, address, status, created_at, updated_at
        FROM members
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, member: &NewMember) -> Result<Member, ApiError> {
    let row = sqlx::query_as::<_, Member>(
        r#"
        INSERT INTO members (name, email, phone, address, status)
        VALUES ($1, $2, $3, $4, COALESCE($5, 'active'))
        RETURNING id, name, email, phone, address, status, created_at, updated_at
        "#,
    )
    .bind(&member.name)
    .bind(&member.email)
    .bind(&member.phone)
    .bind(&member.address)
    .bind(&member.status)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(db: &PgPool, id: Uuid, member: &NewMember) -> Result<Option<Member>, ApiError> {
    let row = sqlx::query_as::<_, Member>(
        r#"
        UPDATE members
        SET name = $2,
            email = $3,
            phone = $4,
            address = $5,
            status = COALESCE($6, status),
            updated_at = now()
        WHERE id = $1
        RETURNING id, name, email, phone, address, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&member.name)
    .bind(&member.email)
    .bind(&member.phone)
    .bind(&member.address)
    .bind(&member.status)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM members WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
