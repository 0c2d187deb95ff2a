use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::media::repo::{self, MediaResource};
use crate::state::AppState;

pub struct NewUpload {
    pub title: String,
    pub description: Option<String>,
    /// Overrides the kind inferred from the content type.
    pub kind: Option<String>,
    pub body: Bytes,
    pub content_type: String,
}

const KINDS: [&str; 5] = ["image", "audio", "video", "document", "file"];

/// Store the object first, then the row; a failed insert leaks only an
/// unreferenced object.
pub async fn upload_media(state: &AppState, upload: NewUpload) -> Result<MediaResource, ApiError> {
    if upload.title.trim().is_empty() {
        return Err(ApiError::Validation("Media title is required".into()));
    }
    if upload.body.is_empty() {
        return Err(ApiError::Validation("File is required".into()));
    }

    let kind = resolve_kind(upload.kind.as_deref(), &upload.content_type)?;
    let ext = ext_from_mime(&upload.content_type).unwrap_or("bin");
    let key = format!("media/{}/{}.{}", kind, Uuid::new_v4(), ext);
    let size_bytes = upload.body.len() as i64;

    state
        .storage
        .put_object(&key, upload.body, &upload.content_type)
        .await
        .map_err(ApiError::Storage)?;

    let row = repo::insert(
        &state.db,
        &upload.title,
        upload.description.as_deref(),
        kind,
        &key,
        &upload.content_type,
        size_bytes,
    )
    .await?;

    info!(media_id = %row.id, key = %key, "media uploaded");
    Ok(row)
}

fn resolve_kind(requested: Option<&str>, content_type: &str) -> Result<&'static str, ApiError> {
    let Some(k) = requested.map(str::trim).filter(|k| !k.is_empty()) else {
        return Ok(kind_from_mime(content_type));
    };
    KINDS
        .iter()
        .find(|known| **known == k)
        .copied()
        .ok_or_else(|| ApiError::Validation("Unknown media kind".into()))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "audio/mpeg" => Some("mp3"),
        "audio/wav" | "audio/x-wav" => Some("wav"),
        "video/mp4" => Some("mp4"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

fn kind_from_mime(ct: &str) -> &'static str {
    if ct == "application/pdf" {
        return "document";
    }
    match ct.split('/').next().unwrap_or("") {
        "image" => "image",
        "audio" => "audio",
        "video" => "video",
        _ => "file",
    }
}

#[cfg(test)]
mod media_tests {
    use super::*;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("audio/mpeg"), Some("mp3"));
        assert_eq!(ext_from_mime("video/mp4"), Some("mp4"));
        assert_eq!(ext_from_mime("application/pdf"), Some("pdf"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(kind_from_mime("image/png"), "image");
        assert_eq!(kind_from_mime("audio/mpeg"), "audio");
        assert_eq!(kind_from_mime("video/mp4"), "video");
        assert_eq!(kind_from_mime("application/pdf"), "document");
        assert_eq!(kind_from_mime("application/octet-stream"), "file");
    }

    #[tokio::test]
    async fn upload_requires_title_and_body() {
        let state = AppState::fake();

        let no_title = upload_media(
            &state,
            NewUpload {
                title: String::new(),
                description: None,
                kind: None,
                body: Bytes::from_static(b"data"),
                content_type: "audio/mpeg".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(no_title, ApiError::Validation(_)));

        let no_body = upload_media(
            &state,
            NewUpload {
                title: "Sunday sermon".to_string(),
                description: None,
                kind: None,
                body: Bytes::new(),
                content_type: "audio/mpeg".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(no_body, ApiError::Validation(_)));
    }

    #[test]
    fn kind_override_beats_inference() {
        assert_eq!(resolve_kind(None, "image/png").unwrap(), "image");
        assert_eq!(resolve_kind(Some("document"), "image/png").unwrap(), "document");
        assert_eq!(resolve_kind(Some("  audio "), "video/mp4").unwrap(), "audio");
        let err = resolve_kind(Some("presentation"), "image/png").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
