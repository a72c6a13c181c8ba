//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lumen_core::ContentError;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::media::MediaError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Not found")]
    NotFound,

    /// Request is malformed.
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
            Self::Auth(err) => err.status(),
            Self::Media(err) => err.status(),
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
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_owned()
        } else {
            match &self {
                Self::Content(err) => err.user_message(),
                Self::Auth(err) => err.user_message(),
                Self::Media(err) => err.to_string(),
                Self::NotFound => "Not found".to_owned(),
                Self::BadRequest(msg) => msg.clone(),
                Self::Session(_) | Self::Internal(_) => "Internal server error".to_owned(),
            }
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in editor.
pub fn set_sentry_user(session: &lumen_core::auth::Session) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(session.subject_id.to_string()),
            email: Some(session.email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
