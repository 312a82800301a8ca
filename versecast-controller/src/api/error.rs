//! HTTP error responses
//!
//! Every failure leaves the service as `{"error": {"code", "message"}}` with
//! a status code chosen from the controller error kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Wrong upload type (415)
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::EntryNotFound(_) | Error::SongNotFound(_) => ApiError::NotFound(message),
            Error::InvalidFileType(_) => ApiError::UnsupportedMediaType(message),
            Error::MalformedPlaylist(_) | Error::InvalidInput(_) | Error::NoEntryOpen => {
                ApiError::BadRequest(message)
            }
            Error::Catalog(_)
            | Error::Storage(_)
            | Error::Io(_)
            | Error::Internal(_)
            | Error::Http(_) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg,
            ),
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        if status.is_client_error() {
            warn!("Rejected request ({}): {}", status.as_u16(), message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::EntryNotFound(3), StatusCode::NOT_FOUND),
            (Error::SongNotFound(9), StatusCode::NOT_FOUND),
            (
                Error::InvalidFileType("text/plain".to_string()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (Error::NoEntryOpen, StatusCode::BAD_REQUEST),
            (
                Error::InvalidInput("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_malformed_playlist_is_bad_request() {
        let parse_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let response = ApiError::from(Error::MalformedPlaylist(parse_err)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
