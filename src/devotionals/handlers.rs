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
    devotionals::{dto::NewDevotional, repo, repo::Devotional},
    error::ApiError,
    pagination::Pagination,
    state::AppState,
};

pub fn devotional_routes() -> Router<AppState> {
    Router::new()
        .route("/devotionals", get(list_devotionals).post(create_devotional))
        .route(
            "/devotionals/:id",
            get(get_devotional)
                .put(update_devotional)
                .delete(delete_devotional),
        )
}

#[instrument(skip(state))]
pub async fn list_devotionals(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Devotional>>, ApiError> {
    let devotionals = repo::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(devotionals))
}

#[instrument(skip(state))]
pub async fn get_devotional(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Devotional>, ApiError> {
    let devotional = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Devotional"))?;
    Ok(Json(devotional))
}

#[instrument(skip(state, payload))]
pub async fn create_devotional(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<NewDevotional>,
) -> Result<(StatusCode, Json<Devotional>), ApiError> {
    payload.validate()?;
    let devotional = repo::insert(&state.db, &payload).await?;
    info!(devotional_id = %devotional.id, published = payload.published, "devotional created");
    Ok((StatusCode::CREATED, Json(devotional)))
}

#[instrument(skip(state, payload))]
pub async fn update_devotional(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewDevotional>,
) -> Result<Json<Devotional>, ApiError> {
    payload.validate()?;
    let devotional = repo::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Devotional"))?;
    info!(devotional_id = %id, "devotional updated");
    Ok(Json(devotional))
}

#[instrument(skip(state))]
pub async fn delete_devotional(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Devotional"));
    }
    info!(devotional_id = %id, "devotional deleted");
    Ok(StatusCode::NO_CONTENT)
}
