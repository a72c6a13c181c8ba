//! Markdown page route handlers (about, privacy, refund policy).

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, response::IntoResponse, routing::get};
use chrono::NaiveDate;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

impl ContentPageTemplate {
    /// "Last updated" line, if the page declares a date.
    #[must_use]
    pub fn updated_label(&self) -> Option<String> {
        self.updated_at
            .map(|date| format!("Last updated {}", date.format("%B %-d, %Y")))
    }
}

fn serve_page(state: &AppState, key: &str) -> Result<ContentPageTemplate> {
    let page = state.pages().get(key).ok_or(AppError::NotFound)?;

    Ok(ContentPageTemplate {
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html.clone(),
    })
}

/// # Errors
///
/// Returns 404 if the page was not loaded.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> Result<impl IntoResponse> {
    serve_page(&state, "about")
}

/// # Errors
///
/// Returns 404 if the page was not loaded.
#[instrument(skip(state))]
pub async fn privacy(State(state): State<AppState>) -> Result<impl IntoResponse> {
    serve_page(&state, "privacy")
}

/// # Errors
///
/// Returns 404 if the page was not loaded.
#[instrument(skip(state))]
pub async fn refund_policy(State(state): State<AppState>) -> Result<impl IntoResponse> {
    serve_page(&state, "refund-policy")
}

/// Create the pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/privacy", get(privacy))
        .route("/refund-policy", get(refund_policy))
}
