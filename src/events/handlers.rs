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
    error::ApiError,
    events::{
        dto::{EventListQuery, NewEvent},
        repo,
        repo::Event,
    },
    state::AppState,
};

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(q): Query<EventListQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = repo::list(&state.db, q.upcoming, q.limit, q.offset).await?;
    Ok(Json(events))
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Event"))?;
    Ok(Json(event))
}

#[instrument(skip(state, payload))]
pub async fn create_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    payload.validate()?;
    let event = repo::insert(&state.db, &payload).await?;
    info!(event_id = %event.id, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

#[instrument(skip(state, payload))]
pub async fn update_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewEvent>,
) -> Result<Json<Event>, ApiError> {
    payload.validate()?;
    let event = repo::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Event"))?;
    info!(event_id = %id, "event updated");
    Ok(Json(event))
}

#[instrument(skip(state))]
pub async fn delete_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Event"));
    }
    info!(event_id = %id, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}
