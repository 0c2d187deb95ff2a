use bytes::Bytes;
use image::{imageops, ImageFormat};
use std::io::Cursor;
use tracing::warn;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Every stored avatar is this wide; height follows the source aspect ratio.
pub const AVATAR_WIDTH: u32 = 200;
pub const AVATAR_URL_TTL_SECS: u64 = 30 * 60;

/// Decode an uploaded avatar and re-encode it as a fixed-width JPEG. Bytes
/// that no decoder recognizes are the caller's fault; a failed JPEG encode
/// of a decoded image is ours.
pub fn normalize_avatar(bytes: &[u8]) -> Result<Bytes, ApiError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ApiError::Validation(format!("Unreadable image: {e}")))?;

    // JPEG has no alpha channel.
    let rgb = img.into_rgb8();
    let scaled_height =
        ((rgb.height() as u64 * AVATAR_WIDTH as u64) / rgb.width() as u64).max(1) as u32;
    let resized = imageops::resize(
        &rgb,
        AVATAR_WIDTH,
        scaled_height,
        imageops::FilterType::Lanczos3,
    );

    let mut buf = Cursor::new(Vec::new());
    resized
        .write_to(&mut buf, ImageFormat::Jpeg)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("jpeg encode: {e}")))?;
    Ok(Bytes::from(buf.into_inner()))
}

/// Fresh object key for a user's avatar. A new key per upload keeps stale
/// presigned URLs from pointing at the replacement image.
pub fn avatar_key(user_id: Uuid) -> String {
    format!("avatars/{}/{}.jpg", user_id, Uuid::new_v4())
}

/// Presigned display URL for the user's avatar, if one is stored. A presign
/// failure only costs the URL, not the request.
pub async fn avatar_url_for(state: &AppState, user: &User) -> Option<String> {
    let key = user.avatar_key.as_ref()?;
    match state.storage.presign_get(key, AVATAR_URL_TTL_SECS).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(error = %e, key = %key, "presign avatar failed");
            None
        }
    }
}

#[cfg(test)]
mod avatar_tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn fixture(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, format)
            .expect("encode fixture");
        buf.into_inner()
    }

    fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
        let rgb = image::load_from_memory(bytes)
            .expect("decode result")
            .into_rgb8();
        (rgb.width(), rgb.height())
    }

    #[test]
    fn normalizes_to_fixed_width_jpeg() {
        let out = normalize_avatar(&fixture(800, 600, ImageFormat::Jpeg)).expect("normalize");
        assert_eq!(decoded_dimensions(&out), (200, 150));
        assert_eq!(image::guess_format(&out).expect("format"), ImageFormat::Jpeg);
    }

    #[test]
    fn upscales_small_images_to_the_same_width() {
        let out = normalize_avatar(&fixture(100, 50, ImageFormat::Jpeg)).expect("normalize");
        assert_eq!(decoded_dimensions(&out), (200, 100));
    }

    #[test]
    fn png_input_becomes_jpeg() {
        let out = normalize_avatar(&fixture(400, 400, ImageFormat::Png)).expect("normalize");
        assert_eq!(image::guess_format(&out).expect("format"), ImageFormat::Jpeg);
        assert_eq!(decoded_dimensions(&out), (200, 200));
    }

    #[test]
    fn rejects_garbage_bytes() {
        let err = normalize_avatar(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn avatar_key_is_scoped_to_the_user() {
        let user_id = Uuid::new_v4();
        let key = avatar_key(user_id);
        assert!(key.starts_with(&format!("avatars/{}/", user_id)));
        assert!(key.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn avatar_url_uses_the_stored_key() {
        let state = AppState::fake();
        let hash = crate::auth::services::hash_password("password123").expect("hash");
        let mut user = state
            .users
            .create("admin@parish.test", &hash)
            .await
            .expect("create");

        assert_eq!(avatar_url_for(&state, &user).await, None);

        user.avatar_key = Some("avatars/x/y.jpg".to_string());
        let url = avatar_url_for(&state, &user).await.expect("url");
        assert!(url.contains("avatars/x/y.jpg"));
    }
}
