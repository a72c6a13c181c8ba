//! Services page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use lumen_core::content::Audience;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::routes::views::ServiceCard;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub services: Vec<ServiceCard>,
}

/// List published services in display order.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let services = state.services().list(Audience::Public).await?;
    Ok(ServicesTemplate {
        services: services.iter().map(ServiceCard::from).collect(),
    })
}
