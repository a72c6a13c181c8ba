//! Contact form route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use lumen_core::ContentError;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash::{self, Flash};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub flash: Flash,
}

/// Contact form fields.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Display the contact form.
#[instrument(skip_all)]
pub async fn show(Query(flash): Query<Flash>) -> impl IntoResponse {
    ContactTemplate { flash }
}

/// Store a contact message for the admin inbox.
///
/// Invalid input redirects back with the reason; nothing is stored.
///
/// # Errors
///
/// Returns the content store error when the message cannot be saved.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    match state
        .inbox()
        .submit(&form.name, &form.email, &form.message)
        .await
    {
        Ok(_) => Ok(flash::notice(
            "/contact",
            "Thanks for getting in touch. We'll reply within two working days.",
        )
        .into_response()),
        Err(ContentError::Validation(e)) => {
            Ok(flash::error("/contact", &capitalize(&e.to_string())).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Upper-case the first letter of a validation message for display.
pub(crate) fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("name is required"), "Name is required");
        assert_eq!(capitalize(""), "");
    }
}
