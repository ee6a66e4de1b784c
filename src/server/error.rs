use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::TagError;

/// Error returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    Tag(TagError),
    ImageNotFound,
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Tag(TagError::Validation(message.into()))
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Tag(TagError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            // Service-side paths are not meaningful to the user
            ApiError::Tag(TagError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Directory not found".to_string())
            }
            ApiError::Tag(TagError::NotADirectory(_)) => {
                (StatusCode::BAD_REQUEST, "Path is not a directory".to_string())
            }
            ApiError::Tag(e @ TagError::Io { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::ImageNotFound => (StatusCode::NOT_FOUND, "Image not found".to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl From<TagError> for ApiError {
    fn from(e: TagError) -> Self {
        ApiError::Tag(e)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!("{}", message);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
