use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::donations::dto::NewDonation;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Donation {
    pub id: Uuid,
    pub donor: String,
    pub amount: Decimal,
    pub method: String,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub donated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One row per calendar month, newest first.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: Decimal,
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Donation>, ApiError> {
    let rows = sqlx::query_as::<_, Donation>(
        r#"
        SELECT id, donor, amount, method, note, donated_at, created_at
        FROM donations
        ORDER BY donated_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Donation>, ApiError> {
    let row = sqlx::query_as::<_, Donation>(
        r#"
        SELECT id, donor, amount, method, note, donated_at, created_at
        FROM donations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, donation: &NewDonation) -> Result<Donation, ApiError> {
    let row = sqlx::query_as::<_, Donation>(
        r#"
        INSERT INTO donations (donor, amount, method, note, donated_at)
        VALUES ($1, $2, COALESCE($3, 'cash'), $4, COALESCE($5, now()))
        RETURNING id, donor, amount, method, note, donated_at, created_at
        "#,
    )
    .bind(&donation.donor)
    .bind(donation.amount)
    .bind(&donation.method)
    .bind(&donation.note)
    .bind(donation.donated_at)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    donation: &NewDonation,
) -> Result<Option<Donation>, ApiError> {
    let row = sqlx::query_as::<_, Donation>(
        r#"
        UPDATE donations
        SET donor = $2,
            amount = $3,
            method = COALESCE($4, method),
            note = $5,
            donated_at = COALESCE($6, donated_at)
        WHERE id = $1
        RETURNING id, donor, amount, method, note, donated_at, created_at
        "#,
    )
    .bind(id)
    .bind(&donation.donor)
    .bind(donation.amount)
    .bind(&donation.method)
    .bind(&donation.note)
    .bind(donation.donated_at)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM donations WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn monthly_totals(db: &PgPool) -> Result<Vec<MonthlyTotal>, ApiError> {
    let rows = sqlx::query_as::<_, MonthlyTotal>(
        r#"
        SELECT to_char(date_trunc('month', donated_at), 'YYYY-MM') AS month,
               SUM(amount) AS total
        FROM donations
        GROUP BY 1
        ORDER BY 1 DESC
        LIMIT 12
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
