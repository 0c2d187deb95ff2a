use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    donations::{
        dto::NewDonation,
        repo,
        repo::{Donation, MonthlyTotal},
    },
    error::ApiError,
    pagination::Pagination,
    state::AppState,
};

pub fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/donations", get(list_donations).post(record_donation))
        .route("/donations/summary", get(donation_summary))
        .route(
            "/donations/:id",
            get(get_donation).put(update_donation).delete(delete_donation),
        )
}

#[instrument(skip(state))]
pub async fn list_donations(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Donation>>, ApiError> {
    let donations = repo::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(donations))
}

#[instrument(skip(state))]
pub async fn get_donation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Donation>, ApiError> {
    let donation = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Donation"))?;
    Ok(Json(donation))
}

#[instrument(skip(state, payload))]
pub async fn record_donation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<NewDonation>,
) -> Result<(StatusCode, Json<Donation>), ApiError> {
    payload.validate()?;
    let donation = repo::insert(&state.db, &payload).await?;
    info!(donation_id = %donation.id, "donation recorded");
    Ok((StatusCode::CREATED, Json(donation)))
}

#[instrument(skip(state, payload))]
pub async fn update_donation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewDonation>,
) -> Result<Json<Donation>, ApiError> {
    payload.validate()?;
    let donation = repo::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Donation"))?;
    info!(donation_id = %id, "donation updated");
    Ok(Json(donation))
}

#[instrument(skip(state))]
pub async fn delete_donation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Donation"));
    }
    info!(donation_id = %id, "donation deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Totals per calendar month for the last twelve months with any giving.
#[instrument(skip(state))]
pub async fn donation_summary(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<MonthlyTotal>>, ApiError> {
    let totals = repo::monthly_totals(&state.db).await?;
    Ok(Json(totals))
}
