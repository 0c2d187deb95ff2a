use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Event title is required".into()));
        }
        if let Some(ends_at) = self.ends_at {
            if ends_at < self.starts_at {
                return Err(ApiError::Validation(
                    "Event cannot end before it starts".into(),
                ));
            }
        }
        Ok(())
    }
}

/// List query: `upcoming=true` restricts to events that have not started
/// yet, ordered soonest first.
#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    #[serde(default)]
    pub upcoming: bool,
    #[serde(default = "crate::pagination::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[cfg(test)]
mod validation_tests {
    use super::*;
    use time::Duration;

    fn event(title: &str, ends_offset_minutes: Option<i64>) -> NewEvent {
        let starts_at = OffsetDateTime::now_utc();
        NewEvent {
            title: title.to_string(),
            description: None,
            location: None,
            starts_at,
            ends_at: ends_offset_minutes.map(|m| starts_at + Duration::minutes(m)),
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = event("  ", None).validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = event("Easter service", Some(-30)).validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn open_ended_and_well_ordered_events_pass() {
        assert!(event("Easter service", None).validate().is_ok());
        assert!(event("Easter service", Some(90)).validate().is_ok());
    }
}
