//! One-shot notifications carried in the redirect URL.
//!
//! Form handlers redirect back with `?notice=` or `?error=`; the target
//! page renders whichever is present once.

use axum::response::Redirect;
use serde::Deserialize;

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

/// Append a query parameter, keeping any `#fragment` at the end.
fn with_param(path: &str, key: &str, value: &str) -> String {
    let (base, fragment) = path.split_once('#').map_or((path, None), |(b, f)| (b, Some(f)));
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    let separator = if base.contains('?') { '&' } else { '?' };
    match fragment {
        Some(fragment) => format!("{base}{separator}{query}#{fragment}"),
        None => format!("{base}{separator}{query}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_param_encodes_value() {
        assert_eq!(
            with_param("/contact", "error", "name is required"),
            "/contact?error=name+is+required"
        );
    }

    #[test]
    fn test_with_param_keeps_fragment() {
        assert_eq!(
            with_param("/blog/hello#comments", "notice", "Thanks!"),
            "/blog/hello?notice=Thanks%21#comments"
        );
    }

    #[test]
    fn test_with_param_appends_to_existing_query() {
        assert_eq!(with_param("/a?x=1", "notice", "ok"), "/a?x=1&notice=ok");
    }
}
