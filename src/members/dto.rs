use serde::Deserialize;

use crate::auth::services::is_valid_email;
use crate::error::ApiError;

/// Body for creating or replacing a member. `status` falls back to the
/// stored (or default) value when absent.
#[derive(Debug, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
}

impl NewMember {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("Member name is required".into()));
        }
        if let Some(email) = &self.email {
            if !email.is_empty() && !is_valid_email(email) {
                return Err(ApiError::Validation("Invalid email".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn member(name: &str, email: Option<&str>) -> NewMember {
        NewMember {
            name: name.to_string(),
            email: email.map(|e| e.to_string()),
            phone: None,
            address: None,
            status: None,
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = member("   ", None).validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = member("Ann Smith", Some("not-an-email"))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn email_is_optional() {
        assert!(member("Ann Smith", None).validate().is_ok());
        assert!(member("Ann Smith", Some("ann@parish.test")).validate().is_ok());
    }
}
