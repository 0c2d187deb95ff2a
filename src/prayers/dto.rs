use serde::Deserialize;

use crate::error::ApiError;

/// Body of a prayer request submitted from the public site form.
#[derive(Debug, Deserialize)]
pub struct NewPrayerRequest {
    pub requester: String,
    pub request: String,
    pub contact: Option<String>,
}

impl NewPrayerRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.requester.trim().is_empty() {
            return Err(ApiError::Validation("Requester name is required".into()));
        }
        if self.request.trim().is_empty() {
            return Err(ApiError::Validation("Request text is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn requester_and_request_are_required() {
        let no_requester = NewPrayerRequest {
            requester: " ".to_string(),
            request: "Healing for my mother".to_string(),
            contact: None,
        };
        assert!(no_requester.validate().is_err());

        let no_request = NewPrayerRequest {
            requester: "Ann".to_string(),
            request: String::new(),
            contact: Some("ann@parish.test".to_string()),
        };
        assert!(no_request.validate().is_err());

        let complete = NewPrayerRequest {
            requester: "Ann".to_string(),
            request: "Healing for my mother".to_string(),
            contact: None,
        };
        assert!(complete.validate().is_ok());
    }
}
