use tracing::{info, warn};
use uuid::Uuid;

use crate::admin::dto::ProfileUpdate;
use crate::auth::dto::PublicUser;
use crate::auth::services::{hash_password, is_valid_email, verify_password};
use crate::error::ApiError;
use crate::images::services::{avatar_key, avatar_url_for, normalize_avatar};
use crate::state::AppState;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Apply a partial profile update. All preconditions run before anything is
/// persisted: a failed password check or a bad email leaves the stored
/// record untouched, and the credential store sees exactly one save.
pub async fn update_profile(
    state: &AppState,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<PublicUser, ApiError> {
    let mut user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    // The dashboard posts every field and leaves untouched ones empty, so
    // an empty string never overwrites a stored value.
    let name = non_empty(update.name);
    let phone = non_empty(update.phone);
    let email = match non_empty(update.email) {
        Some(raw) => {
            let normalized = raw.trim().to_lowercase();
            if !is_valid_email(&normalized) {
                warn!(user_id = %user_id, "profile update with malformed email");
                return Err(ApiError::Validation("Invalid email".into()));
            }
            Some(normalized)
        }
        None => None,
    };

    let new_hash = match (
        non_empty(update.current_password),
        non_empty(update.new_password),
    ) {
        (Some(current), Some(new)) => {
            if new.len() < 8 {
                return Err(ApiError::Validation("Password too short".into()));
            }
            let matches =
                verify_password(&current, &user.password_hash).map_err(ApiError::Internal)?;
            if !matches {
                warn!(user_id = %user_id, "password rotation with wrong current password");
                return Err(ApiError::InvalidCredentials);
            }
            Some(hash_password(&new).map_err(ApiError::Internal)?)
        }
        (None, None) => None,
        _ => {
            return Err(ApiError::Validation(
                "currentPassword and newPassword must be supplied together".into(),
            ))
        }
    };

    // Upload before save so the record never points at a missing object. A
    // failed save after the put leaks only an unreferenced object.
    let old_avatar_key = user.avatar_key.clone();
    let new_avatar_key = match update.avatar {
        Some(bytes) => {
            let normalized = normalize_avatar(&bytes)?;
            let key = avatar_key(user_id);
            state
                .storage
                .put_object(&key, normalized, "image/jpeg")
                .await
                .map_err(ApiError::Storage)?;
            Some(key)
        }
        None => None,
    };

    if let Some(name) = name {
        user.name = Some(name);
    }
    if let Some(email) = email {
        user.email = email;
    }
    if let Some(phone) = phone {
        user.phone = Some(phone);
    }
    if let Some(hash) = new_hash {
        user.password_hash = hash;
    }
    let replaced_avatar = new_avatar_key.is_some();
    if let Some(key) = new_avatar_key {
        user.avatar_key = Some(key);
    }

    let saved = state.users.save(&user).await?;

    if replaced_avatar {
        if let Some(old) = old_avatar_key {
            if let Err(e) = state.storage.delete_object(&old).await {
                warn!(error = %e, key = %old, "old avatar delete failed");
            }
        }
    }

    info!(user_id = %saved.id, "profile updated");
    let avatar_url = avatar_url_for(state, &saved).await;
    Ok(PublicUser::from_user(&saved, avatar_url))
}

#[cfg(test)]
mod profile_tests {
    use super::*;
    use crate::auth::services::authenticate;
    use bytes::Bytes;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    async fn seeded(email: &str, password: &str) -> (AppState, Uuid) {
        let state = AppState::fake();
        let hash = hash_password(password).expect("hash");
        let user = state.users.create(email, &hash).await.expect("create");
        (state, user.id)
    }

    fn jpeg_fixture(width: u32, height: u32) -> Bytes {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 200])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .expect("encode fixture");
        Bytes::from(buf.into_inner())
    }

    #[tokio::test]
    async fn name_only_update_keeps_other_fields() {
        let (state, id) = seeded("admin@parish.test", "password123").await;
        let updated = update_profile(
            &state,
            id,
            ProfileUpdate {
                name: Some("New Name".into()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

        assert_eq!(updated.name.as_deref(), Some("New Name"));
        assert_eq!(updated.email, "admin@parish.test");
        assert_eq!(updated.phone, None);
    }

    #[tokio::test]
    async fn empty_fields_do_not_overwrite() {
        let (state, id) = seeded("admin@parish.test", "password123").await;
        update_profile(
            &state,
            id,
            ProfileUpdate {
                name: Some("Pastor Jim".into()),
                phone: Some("555-0100".into()),
                ..Default::default()
            },
        )
        .await
        .expect("first update");

        let updated = update_profile(
            &state,
            id,
            ProfileUpdate {
                name: Some(String::new()),
                phone: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .expect("second update");

        assert_eq!(updated.name.as_deref(), Some("Pastor Jim"));
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn wrong_current_password_leaves_record_untouched() {
        let (state, id) = seeded("admin@parish.test", "password123").await;
        let before = state
            .users
            .find_by_id(id)
            .await
            .expect("find")
            .expect("user");

        let err = update_profile(
            &state,
            id,
            ProfileUpdate {
                name: Some("Should Not Stick".into()),
                current_password: Some("wrong-password".into()),
                new_password: Some("another-password".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));

        let after = state
            .users
            .find_by_id(id)
            .await
            .expect("find")
            .expect("user");
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn rotation_changes_the_accepted_password() {
        let (state, id) = seeded("admin@parish.test", "old-password-1").await;
        update_profile(
            &state,
            id,
            ProfileUpdate {
                current_password: Some("old-password-1".into()),
                new_password: Some("new-password-2".into()),
                ..Default::default()
            },
        )
        .await
        .expect("rotate");

        authenticate(&state, "admin@parish.test", "new-password-2")
            .await
            .expect("new password accepted");
        let err = authenticate(&state, "admin@parish.test", "old-password-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn half_supplied_rotation_is_a_validation_error() {
        let (state, id) = seeded("admin@parish.test", "password123").await;
        let err = update_profile(
            &state,
            id,
            ProfileUpdate {
                current_password: Some("password123".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let state = AppState::fake();
        let err = update_profile(&state, Uuid::new_v4(), ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn unreadable_avatar_is_a_validation_error() {
        let (state, id) = seeded("admin@parish.test", "password123").await;
        let err = update_profile(
            &state,
            id,
            ProfileUpdate {
                avatar: Some(Bytes::from_static(b"not an image")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn avatar_upload_is_normalized_and_replaces_the_key() {
        let (state, id) = seeded("admin@parish.test", "password123").await;

        let updated = update_profile(
            &state,
            id,
            ProfileUpdate {
                avatar: Some(jpeg_fixture(640, 480)),
                ..Default::default()
            },
        )
        .await
        .expect("first upload");

        let stored = state
            .users
            .find_by_id(id)
            .await
            .expect("find")
            .expect("user");
        let first_key = stored.avatar_key.expect("avatar key set");
        assert!(first_key.starts_with(&format!("avatars/{}/", id)));
        assert!(first_key.ends_with(".jpg"));
        assert!(updated.avatar_url.expect("url").contains(&first_key));

        update_profile(
            &state,
            id,
            ProfileUpdate {
                avatar: Some(jpeg_fixture(320, 320)),
                ..Default::default()
            },
        )
        .await
        .expect("second upload");

        let stored = state
            .users
            .find_by_id(id)
            .await
            .expect("find")
            .expect("user");
        let second_key = stored.avatar_key.expect("avatar key set");
        assert_ne!(first_key, second_key);
    }
}
