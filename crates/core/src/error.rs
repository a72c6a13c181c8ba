//! Errors shared by every content workflow.

use thiserror::Error;

use crate::types::{EmailError, SlugError};

/// A draft, patch or submission that breaks a field rule.
///
/// Raised before any store call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("invalid slug: {0}")]
    Slug(#[from] SlugError),

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("{field} must be an http(s) URL")]
    InvalidUrl { field: &'static str },

    #[error("{0}")]
    Invalid(String),
}

impl ValidationError {
    /// Check a required free-text field: trimmed, non-empty, bounded.
    ///
    /// # Errors
    ///
    /// Returns `Required` or `TooLong`.
    pub fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Self::Required { field });
        }
        if value.chars().count() > max {
            return Err(Self::TooLong { field, max });
        }
        Ok(())
    }

    /// Check an optional absolute http(s) URL.
    ///
    /// Root-relative paths (`/media/...`) are accepted as well, since uploaded
    /// images are served by the site itself.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl`.
    pub fn check_url(field: &'static str, value: Option<&str>) -> Result<(), Self> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        if value.starts_with('/') && !value.starts_with("//") {
            return Ok(());
        }
        match url::Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            _ => Err(Self::InvalidUrl { field }),
        }
    }
}

/// Errors from the content store and the workflows built on it.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Input rejected before reaching the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A uniqueness rule (slug, service title, account email) was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store could not be reached or failed the request.
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    #[error("not found")]
    NotFound,

    /// Stored data failed to map back into a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl ContentError {
    /// Message safe to show an editor in a flash notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Conflict(what) => format!("Already exists: {what}"),
            Self::NotFound => "That item no longer exists".to_owned(),
            Self::Unavailable(_) | Self::DataCorruption(_) => {
                "The content store is unavailable, please try again".to_owned()
            }
        }
    }

    /// Whether the error is the caller's fault (4xx) rather than ours.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Conflict(_) | Self::NotFound
        )
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for ContentError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                let what = match db_err.constraint() {
                    Some(c) if c.contains("slug") => "an item with this slug",
                    Some(c) if c.contains("title") => "an item with this title",
                    Some(c) if c.contains("email") => "an account with this email",
                    _ => "a record with these values",
                };
                Self::Conflict(what.to_owned())
            }
            other => Self::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_text() {
        assert_eq!(
            ValidationError::check_text("title", "  ", 10),
            Err(ValidationError::Required { field: "title" })
        );
        assert_eq!(
            ValidationError::check_text("title", "abcdefghijk", 10),
            Err(ValidationError::TooLong {
                field: "title",
                max: 10
            })
        );
        assert!(ValidationError::check_text("title", " ok ", 2).is_ok());
    }

    #[test]
    fn test_check_text_counts_chars_not_bytes() {
        assert!(ValidationError::check_text("name", "ÅÄÖ", 3).is_ok());
    }

    #[test]
    fn test_check_url() {
        assert!(ValidationError::check_url("live_url", None).is_ok());
        assert!(ValidationError::check_url("live_url", Some("")).is_ok());
        assert!(ValidationError::check_url("live_url", Some("https://lumen.studio")).is_ok());
        assert!(ValidationError::check_url("image_url", Some("/media/a.png")).is_ok());
        assert!(ValidationError::check_url("live_url", Some("//evil.example")).is_err());
        assert!(ValidationError::check_url("live_url", Some("javascript:alert(1)")).is_err());
        assert!(ValidationError::check_url("live_url", Some("not a url")).is_err());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = ContentError::Unavailable("connection refused at 10.0.0.3".into());
        assert!(!err.user_message().contains("10.0.0.3"));
        assert!(!err.is_client_error());
        assert!(ContentError::NotFound.is_client_error());
    }
}
