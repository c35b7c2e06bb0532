use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Request-level failures, rendered as `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Coffee not found.")]
    NotFound,
    #[error("You have already voted for this coffee.")]
    AlreadyVoted,
    #[error("{1}")]
    Invalid(StatusCode, String),
    /// Store failure; `detail` goes to the client, `source` only to the log.
    #[error("{detail}")]
    Store { detail: &'static str, source: ServiceError },
}

impl ApiError {
    /// Replace the client-facing message of a store failure.
    pub fn with_store_detail(self, detail: &'static str) -> Self {
        match self {
            ApiError::Store { source, .. } => ApiError::Store { detail, source },
            other => other,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::AlreadyVoted => StatusCode::BAD_REQUEST,
            ApiError::Invalid(status, _) => *status,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_store_failure() {
            return ApiError::Store { detail: "Internal server error.", source: e };
        }
        match e {
            ServiceError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Invalid(StatusCode::UNPROCESSABLE_ENTITY, other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Store { source, .. } = &self {
            error!(error = %source, "store operation failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
