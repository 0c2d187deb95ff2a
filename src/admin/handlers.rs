use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    admin::{
        dto::{LoginHistoryEntry, ProfileResponse, ProfileUpdate},
        services::update_profile,
    },
    auth::services::AuthUser,
    error::ApiError,
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/profile/:id", put(put_profile))
        .route("/admin/login-history", get(login_history))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}

async fn text_field(field: Field<'_>) -> Result<Option<String>, ApiError> {
    let value = field.text().await.map_err(|e| {
        warn!(error = %e, "unreadable multipart field");
        ApiError::Validation("Malformed multipart body".into())
    })?;
    Ok(Some(value).filter(|v| !v.is_empty()))
}

/// PUT /admin/profile/:id (multipart)
/// Text fields: name/email/phone/currentPassword/newPassword, file field:
/// "file" with the raw avatar. Unknown fields are ignored.
#[instrument(skip(state, multipart))]
pub async fn put_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>, ApiError> {
    info!(caller = %auth.id, role = ?auth.role, user_id = %id, "profile update requested");

    let mut update = ProfileUpdate::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "malformed multipart body");
        ApiError::Validation("Malformed multipart body".into())
    })? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                let data = field.bytes().await.map_err(|e| {
                    warn!(error = %e, "unreadable avatar upload");
                    ApiError::Validation("Malformed multipart body".into())
                })?;
                if !data.is_empty() {
                    update.avatar = Some(data);
                }
            }
            "name" => update.name = text_field(field).await?,
            "email" => update.email = text_field(field).await?,
            "phone" => update.phone = text_field(field).await?,
            "currentPassword" => update.current_password = text_field(field).await?,
            "newPassword" => update.new_password = text_field(field).await?,
            _ => {}
        }
    }

    let user = update_profile(&state, id, update).await?;
    Ok(Json(ProfileResponse {
        message: "Profile updated successfully",
        user,
    }))
}

/// There is no persisted audit trail to derive these from; the dashboard
/// renders fixed placeholder entries.
#[instrument]
pub async fn login_history(_auth: AuthUser) -> Json<Vec<LoginHistoryEntry>> {
    Json(vec![
        LoginHistoryEntry {
            timestamp: "2024-04-08 09:12",
            ip: "192.168.1.24",
            device: "Chrome on Windows",
            status: "Success",
        },
        LoginHistoryEntry {
            timestamp: "2024-04-07 18:40",
            ip: "192.168.1.24",
            device: "Safari on iPhone",
            status: "Success",
        },
        LoginHistoryEntry {
            timestamp: "2024-04-06 08:03",
            ip: "10.0.0.5",
            device: "Firefox on Linux",
            status: "Failed",
        },
    ])
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use crate::auth::{dto::PublicUser, repo_types::Role};

    #[test]
    fn profile_response_has_message_and_sanitized_user() {
        let response = ProfileResponse {
            message: "Profile updated successfully",
            user: PublicUser {
                id: Uuid::new_v4(),
                email: "admin@parish.test".to_string(),
                name: Some("Pastor Jim".to_string()),
                phone: None,
                avatar_url: Some("https://fake.local/avatars/x.jpg".to_string()),
                role: Role::Admin,
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("Profile updated successfully"));
        assert!(json.contains("admin@parish.test"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn login_history_rows_serialize() {
        let row = LoginHistoryEntry {
            timestamp: "2024-04-08 09:12",
            ip: "192.168.1.24",
            device: "Chrome on Windows",
            status: "Success",
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("Chrome on Windows"));
        assert!(json.contains("Success"));
    }
}
