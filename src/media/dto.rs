use serde::Deserialize;

use crate::error::ApiError;

/// Metadata edit for an already-uploaded resource. The stored object itself
/// is immutable; re-upload to replace it.
#[derive(Debug, Deserialize)]
pub struct UpdateMedia {
    pub title: String,
    pub description: Option<String>,
}

impl UpdateMedia {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Media title is required".into()));
        }
        Ok(())
    }
}
