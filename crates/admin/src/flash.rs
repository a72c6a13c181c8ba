//! Transient notifications after a form post.
//!
//! Handlers redirect back with `?notice=` or `?error=`; the admin layout
//! renders whichever is present.

use axum::response::{IntoResponse, Redirect, Response};
use lumen_core::ContentError;
use serde::Deserialize;

use crate::error::AppError;

/// Notification query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Flash {
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Redirect to `path` with a success notice.
#[must_use]
pub fn notice(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_param(path, "notice", message))
}

/// Redirect to `path` with an error notice.
#[must_use]
pub fn error(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_param(path, "error", message))
}

/// Turn a workflow result into a redirect: success goes to `ok_path` with
/// `ok_message`, an expected failure goes back to `back` with the reason.
///
/// # Errors
///
/// Store failures are returned for the error page.
pub fn outcome<T>(
    result: Result<T, ContentError>,
    ok_path: &str,
    ok_message: &str,
    back: &str,
) -> Result<Response, AppError> {
    match result {
        Ok(_) => Ok(notice(ok_path, ok_message).into_response()),
        Err(e) => failure(e, back),
    }
}

/// Redirect back to `back` for an expected failure.
///
/// # Errors
///
/// Store failures are returned for the error page.
pub fn failure(err: ContentError, back: &str) -> Result<Response, AppError> {
    if err.is_client_error() {
        Ok(error(back, &err.user_message()).into_response())
    } else {
        Err(err.into())
    }
}

fn with_param(path: &str, key: &str, value: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{query}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::header::LOCATION;
    use lumen_core::ValidationError;

    use super::*;

    fn location(response: &Response) -> &str {
        response.headers().get(LOCATION).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_with_param() {
        assert_eq!(
            with_param("/admin/blog", "notice", "Post created"),
            "/admin/blog?notice=Post+created"
        );
        assert_eq!(with_param("/admin?x=1", "error", "no"), "/admin?x=1&error=no");
    }

    #[test]
    fn test_outcome_success() {
        let response = outcome(Ok(()), "/admin/blog", "Saved", "/admin/blog/new").unwrap();
        assert_eq!(location(&response), "/admin/blog?notice=Saved");
    }

    #[test]
    fn test_outcome_validation_goes_back() {
        let err: ContentError = ValidationError::Required { field: "title" }.into();
        let response = outcome::<()>(Err(err), "/admin/blog", "Saved", "/admin/blog/new").unwrap();
        assert_eq!(location(&response), "/admin/blog/new?error=title+is+required");
    }

    #[test]
    fn test_outcome_store_failure_is_an_error() {
        let err = ContentError::Unavailable("down".to_owned());
        assert!(outcome::<()>(Err(err), "/a", "ok", "/b").is_err());
    }
}
