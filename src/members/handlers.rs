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
    members::{dto::NewMember, repo, repo::Member},
    pagination::Pagination,
    state::AppState,
};

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
}

#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Member>>, ApiError> {
    let members = repo::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(members))
}

#[instrument(skip(state))]
pub async fn get_member(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Member>, ApiError> {
    let member = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Member"))?;
    Ok(Json(member))
}

#[instrument(skip(state, payload))]
pub async fn create_member(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<NewMember>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    payload.validate()?;
    let member = repo::insert(&state.db, &payload).await?;
    info!(member_id = %member.id, "member created");
    Ok((StatusCode::CREATED, Json(member)))
}

#[instrument(skip(state, payload))]
pub async fn update_member(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewMember>,
) -> Result<Json<Member>, ApiError> {
    payload.validate()?;
    let member = repo::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Member"))?;
    info!(member_id = %id, "member updated");
    Ok(Json(member))
}

#[instrument(skip(state))]
pub async fn delete_member(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Member"));
    }
    info!(member_id = %id, "member deleted");
    Ok(StatusCode::NO_CONTENT)
}
