use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    error::ApiError,
    pagination::Pagination,
    prayers::{dto::NewPrayerRequest, repo, repo::PrayerRequest},
    state::AppState,
};

/// Submission is open to the congregation; everything else is staff-only.
pub fn prayer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/prayer-requests",
            get(list_prayer_requests).post(submit_prayer_request),
        )
        .route(
            "/prayer-requests/:id",
            get(get_prayer_request).delete(delete_prayer_request),
        )
        .route("/prayer-requests/:id/answered", put(toggle_answered))
}

#[instrument(skip(state, payload))]
pub async fn submit_prayer_request(
    State(state): State<AppState>,
    Json(payload): Json<NewPrayerRequest>,
) -> Result<(StatusCode, Json<PrayerRequest>), ApiError> {
    payload.validate()?;
    let request = repo::insert(&state.db, &payload).await?;
    info!(request_id = %request.id, "prayer request submitted");
    Ok((StatusCode::CREATED, Json(request)))
}

#[instrument(skip(state))]
pub async fn list_prayer_requests(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<PrayerRequest>>, ApiError> {
    let requests = repo::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(requests))
}

#[instrument(skip(state))]
pub async fn get_prayer_request(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PrayerRequest>, ApiError> {
    let request = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Prayer request"))?;
    Ok(Json(request))
}

#[instrument(skip(state))]
pub async fn toggle_answered(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PrayerRequest>, ApiError> {
    let request = repo::toggle_answered(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Prayer request"))?;
    info!(request_id = %id, answered = request.answered, "prayer request toggled");
    Ok(Json(request))
}

#[instrument(skip(state))]
pub async fn delete_prayer_request(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Prayer request"));
    }
    info!(request_id = %id, "prayer request deleted");
    Ok(StatusCode::NO_CONTENT)
}
