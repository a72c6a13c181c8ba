//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Badge text for a count: empty for zero, `99+` past ninety-nine.
///
/// Usage in templates: `{{ counts.messages.unread|badge }}`
#[askama::filter_fn]
pub fn badge(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count: u64 = count.to_string().parse().unwrap_or(0);
    Ok(match count {
        0 => String::new(),
        1..=99 => count.to_string(),
        _ => "99+".to_owned(),
    })
}

/// English plural suffix for a count.
#[askama::filter_fn]
pub fn plural(count: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(if count.to_string() == "1" { "" } else { "s" })
}
