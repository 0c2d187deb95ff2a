use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Redirect,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    error::ApiError,
    media::{
        dto::UpdateMedia,
        repo,
        repo::MediaResource,
        services::{upload_media, NewUpload},
    },
    pagination::Pagination,
    state::AppState,
};

pub fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/media", get(list_media).post(upload))
        .route(
            "/media/:id",
            get(get_media).put(update_media).delete(delete_media),
        )
        .route("/media/:id/file", get(download_media))
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024)) // 50MB
}

#[instrument(skip(state))]
pub async fn list_media(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<MediaResource>>, ApiError> {
    let media = repo::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(media))
}

#[instrument(skip(state))]
pub async fn get_media(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MediaResource>, ApiError> {
    let media = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Media"))?;
    Ok(Json(media))
}

/// POST /media (multipart)
/// Text fields: title, description, kind. File field: "file".
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    _auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, HeaderMap, Json<MediaResource>), ApiError> {
    let mut title = String::new();
    let mut description = None;
    let mut kind = None;
    let mut body = bytes::Bytes::new();
    let mut content_type = "application/octet-stream".to_string();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "malformed multipart body");
        ApiError::Validation("Malformed multipart body".into())
    })? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                if let Some(ct) = field.content_type() {
                    content_type = ct.to_string();
                }
                body = field.bytes().await.map_err(|e| {
                    warn!(error = %e, "unreadable media upload");
                    ApiError::Validation("Malformed multipart body".into())
                })?;
            }
            "title" => {
                title = field.text().await.map_err(|e| {
                    warn!(error = %e, "unreadable multipart field");
                    ApiError::Validation("Malformed multipart body".into())
                })?;
            }
            "description" => {
                let value = field.text().await.map_err(|e| {
                    warn!(error = %e, "unreadable multipart field");
                    ApiError::Validation("Malformed multipart body".into())
                })?;
                description = Some(value).filter(|v| !v.is_empty());
            }
            "kind" => {
                let value = field.text().await.map_err(|e| {
                    warn!(error = %e, "unreadable multipart field");
                    ApiError::Validation("Malformed multipart body".into())
                })?;
                kind = Some(value).filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    let media = upload_media(
        &state,
        NewUpload {
            title,
            description,
            kind,
            body,
            content_type,
        },
    )
    .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::LOCATION,
        format!("/api/v1/media/{}", media.id).parse().unwrap(),
    );

    Ok((StatusCode::CREATED, headers, Json(media)))
}

#[instrument(skip(state, payload))]
pub async fn update_media(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMedia>,
) -> Result<Json<MediaResource>, ApiError> {
    payload.validate()?;
    let media = repo::update_metadata(&state.db, id, &payload.title, payload.description.as_deref())
        .await?
        .ok_or(ApiError::NotFound("Media"))?;
    info!(media_id = %id, "media metadata updated");
    Ok(Json(media))
}

/// 302 to a short-lived presigned URL for the stored object.
#[instrument(skip(state))]
pub async fn download_media(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError> {
    let media = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Media"))?;
    let url = state
        .storage
        .presign_get(&media.object_key, 600)
        .await
        .map_err(ApiError::Storage)?;
    Ok(Redirect::temporary(&url))
}

#[instrument(skip(state))]
pub async fn delete_media(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let Some(key) = repo::delete(&state.db, id).await? else {
        return Err(ApiError::NotFound("Media"));
    };
    // Row is gone either way; a stray object is only storage cost.
    if let Err(e) = state.storage.delete_object(&key).await {
        warn!(error = %e, key = %key, "media object delete failed");
    }
    info!(media_id = %id, "media deleted");
    Ok(StatusCode::NO_CONTENT)
}
