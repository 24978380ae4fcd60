use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Conditions raised while deriving query parameters.
///
/// Numeric edge cases never end up here; they are absorbed by value substitution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid timestamp: '{0}'")]
    InvalidTimestamp(String),

    #[error("custom or zoomed view requires explicit start and end")]
    MissingRange,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Metrics backend error: {0}")]
    BackendError(String),

    #[error("Metrics backend is not configured")]
    BackendNotConfigured,
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::BackendError(_) => StatusCode::BAD_GATEWAY,
            AppError::BackendNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        };

        // String provided by thiserror → safe JSON message
        let body = Json(json!({
            "success": false,
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
