use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NewDevotional {
    pub title: String,
    pub scripture: Option<String>,
    pub body: String,
    pub author: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl NewDevotional {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Devotional title is required".into()));
        }
        if self.body.trim().is_empty() {
            return Err(ApiError::Validation("Devotional body is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn title_and_body_are_required() {
        let blank_title = NewDevotional {
            title: String::new(),
            scripture: None,
            body: "In the beginning".to_string(),
            author: None,
            published: false,
        };
        assert!(blank_title.validate().is_err());

        let blank_body = NewDevotional {
            title: "Morning reading".to_string(),
            scripture: Some("Gen 1:1".to_string()),
            body: "   ".to_string(),
            author: None,
            published: false,
        };
        assert!(blank_body.validate().is_err());
    }
}
