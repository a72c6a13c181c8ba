//! Admin authentication error types.

use axum::http::StatusCode;
use lumen_core::{ContentError, EmailError};
use thiserror::Error;

/// Errors that can occur during sign-in and sign-up.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Wrong password for an existing account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account has this email. Shown to users as `InvalidCredentials`.
    #[error("unknown account")]
    UnknownAccount,

    #[error("an account with this email already exists")]
    AccountExists,

    #[error("password hashing failed")]
    PasswordHash,

    #[error("account store error: {0}")]
    Store(#[from] ContentError),
}

impl AuthError {
    /// Message safe to show on the sign-in page.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials | Self::UnknownAccount => {
                "Invalid email or password".to_owned()
            }
            Self::InvalidEmail(e) => format!("Invalid email: {e}"),
            Self::WeakPassword(reason) => capitalize(reason),
            Self::AccountExists => "An account with this email already exists".to_owned(),
            Self::PasswordHash | Self::Store(_) => {
                "Something went wrong, please try again".to_owned()
            }
        }
    }

    /// HTTP status when surfaced as a response rather than a redirect.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_) | Self::WeakPassword(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::UnknownAccount => StatusCode::UNAUTHORIZED,
            Self::AccountExists => StatusCode::CONFLICT,
            Self::Store(ContentError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::PasswordHash | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_account_looks_like_bad_password() {
        assert_eq!(
            AuthError::UnknownAccount.user_message(),
            AuthError::InvalidCredentials.user_message()
        );
        assert_eq!(AuthError::UnknownAccount.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_store_errors_are_hidden() {
        let err = AuthError::Store(ContentError::Unavailable("connection refused".to_owned()));
        assert!(!err.user_message().contains("connection refused"));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
