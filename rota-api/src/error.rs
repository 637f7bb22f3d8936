//! Error responses for the HTTP API

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rota_core::ErrorKind;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type for handlers
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors a handler can answer with
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] rota_core::Error),

    /// Malformed or incomplete request
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        let err = match self {
            ApiError::BadRequest(_) => return (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Core(err) => err,
        };

        match (err.kind(), err) {
            (ErrorKind::NotFound, _) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ErrorKind::AlreadyExists, rota_core::Error::TeamExists(_)) => {
                (StatusCode::BAD_REQUEST, "TEAM_EXISTS")
            }
            (ErrorKind::AlreadyExists, _) => (StatusCode::CONFLICT, "PR_EXISTS"),
            (ErrorKind::InvalidState, _) => (StatusCode::CONFLICT, "PR_MERGED"),
            (ErrorKind::Precondition, _) => (StatusCode::CONFLICT, "NOT_ASSIGNED"),
            (ErrorKind::NoCandidate, _) => (StatusCode::CONFLICT, "NO_CANDIDATE"),
            (ErrorKind::Internal, _) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorBody {
                error: ErrorDetail { code, message },
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Reject an empty identifier before it reaches the engine
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}
