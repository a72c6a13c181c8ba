//! Unified error handling with Sentry integration.
//!
//! Server-side failures are captured to Sentry before responding; clients
//! only ever see a generic message for those.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lumen_core::ContentError;
use thiserror::Error;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Content(err) => match err {
                ContentError::Validation(_) => StatusCode::BAD_REQUEST,
                ContentError::Conflict(_) => StatusCode::CONFLICT,
                ContentError::NotFound => StatusCode::NOT_FOUND,
                ContentError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ContentError::DataCorruption(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Content(err) if err.is_client_error() => err.user_message(),
            Self::Content(ContentError::Unavailable(_)) => {
                "Temporarily unavailable, please try again".to_owned()
            }
            Self::Content(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_owned()
            }
            Self::NotFound => "Page not found".to_owned(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::ValidationError;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(status_of(AppError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::BadRequest("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Content(ContentError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Content(
                ValidationError::Required { field: "name" }.into()
            )),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Content(ContentError::Unavailable("down".to_owned()))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_display() {
        assert_eq!(
            AppError::BadRequest("invalid input".to_owned()).to_string(),
            "Bad request: invalid input"
        );
    }
}
