//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures platform faults to
//! Sentry before responding. Route handlers return `Result<T, AppError>`.
//!
//! The taxonomy mirrors how failures are allowed to surface:
//! classification cannot fail; probe failures fold to "no storefront"
//! before ever reaching here; authentication failures become transient
//! user-visible messages; authorization failures are silent redirects and
//! never flow through this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::backend::BackendError;
use crate::services::SessionError;

/// Application-level error type for the platform.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Session operation failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a platform fault worth reporting, as opposed
    /// to user input the backend rejected.
    fn is_platform_fault(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::Backend(err) | Self::Session(SessionError::Auth(err)) => !err.is_client_fault(),
            Self::Session(SessionError::Storage(_)) => true,
            Self::Session(SessionError::NotAuthenticated)
            | Self::NotFound(_)
            | Self::Unauthorized(_)
            | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_platform_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Backend(err) | Self::Session(SessionError::Auth(err)) => {
                if err.is_client_fault() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            Self::Session(SessionError::Storage(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Session(SessionError::NotAuthenticated) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Backend(err) | Self::Session(SessionError::Auth(err)) => {
                if err.is_client_fault() {
                    err.to_string()
                } else {
                    "External service error".to_owned()
                }
            }
            Self::Session(SessionError::Storage(_)) | Self::Internal(_) => {
                "Internal server error".to_owned()
            }
            Self::Session(SessionError::NotAuthenticated) => "Not signed in".to_owned(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("page".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("session".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::BadRequest("form".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejected_credentials_read_as_client_fault() {
        let err = AppError::Backend(BackendError::Status {
            status: reqwest::StatusCode::UNAUTHORIZED,
            message: "invalid credentials".to_owned(),
        });
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_backend_fault_reads_as_bad_gateway() {
        let err = AppError::Backend(BackendError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_owned(),
        });
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
    }
}
