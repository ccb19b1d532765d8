//! HTTP error mapping.
//!
//! # Invariants
//! - Validation → 400, not-found → 404, storage → 500.
//! - Storage causes are logged, never echoed to clients.
//! - Every error body is `{"success": false, "error": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use todo_core::{ErrorResponse, ServiceError};

/// Application-level error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// A use-case failure from `todo_core`.
    Service(ServiceError),
    /// The request could not be decoded.
    BadRequest(String),
    /// Server-side failure unrelated to the use case (lock poisoning, join
    /// errors).
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::BadRequest(_) | Self::Internal(_) => None,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Service(ServiceError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Service(err @ ServiceError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            Self::Service(err @ ServiceError::Storage { .. }) => {
                error!("event=http_error module=http status=error kind=storage error={err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Internal(message) => {
                error!("event=http_error module=http status=error kind=internal error={message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use todo_core::{RepoError, ServiceError, TodoValidationError};

    #[test]
    fn service_errors_map_to_distinct_statuses() {
        let cases = [
            (
                AppError::from(ServiceError::Validation(TodoValidationError::EmptyText)),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(ServiceError::NotFound("abc".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(ServiceError::Storage {
                    context: "failed to get todos",
                    source: RepoError::InvalidData("bad row".to_string()),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::BadRequest("Invalid request body".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn not_found_message_carries_requested_id() {
        let (_, message) =
            AppError::from(ServiceError::NotFound("abc-123".to_string())).status_and_message();
        assert!(message.contains("abc-123"));
    }

    #[test]
    fn storage_message_hides_cause() {
        let (_, message) = AppError::from(ServiceError::Storage {
            context: "failed to create todo",
            source: RepoError::InvalidData("secret path".to_string()),
        })
        .status_and_message();
        assert!(!message.contains("secret path"));
    }
}
