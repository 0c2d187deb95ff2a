use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application-wide error taxonomy. Handlers return this and the
/// `IntoResponse` impl below is the only place errors become HTTP
/// responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    /// Covers both unknown email and wrong password so callers cannot probe
    /// which accounts exist.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("storage backend failure")]
    Storage(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Storage(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InvalidCredentials | ApiError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            // 5xx details stay in the server log; the caller only sees a
            // generic message.
            ApiError::Storage(source) => {
                error!(error = %source, "storage backend failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(source) => {
                error!(error = %source, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        let cases = [
            (
                ApiError::Validation("bad".into()).into_response().status(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::InvalidCredentials.into_response().status(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::InvalidToken.into_response().status(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::NotFound("User").into_response().status(),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Conflict("taken".into()).into_response().status(),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Storage(anyhow::anyhow!("db down"))
                    .into_response()
                    .status(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (got, want) in cases {
            assert_eq!(got, want);
        }
    }

    #[test]
    fn server_errors_do_not_leak_the_source() {
        let resp = ApiError::Storage(anyhow::anyhow!("password=hunter2 leaked?")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body is built from a fixed message, not from the source error.
        let err = ApiError::Storage(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "storage backend failure");
    }

    #[test]
    fn unknown_user_and_wrong_password_share_one_message() {
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
    }
}
