//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use lumen_core::content::Audience;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::routes::views::{PostSummary, ProjectCard, ServiceCard};
use crate::state::AppState;

/// Recent posts shown on the home page.
const RECENT_POSTS: usize = 3;

/// Featured projects shown on the home page.
const FEATURED_PROJECTS: usize = 6;

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub services: Vec<ServiceCard>,
    pub projects: Vec<ProjectCard>,
    pub recent_posts: Vec<PostSummary>,
}

/// Display the home page: services, selected work and recent posts.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let services = state.services().list(Audience::Public).await?;
    let projects = state.projects().list(Audience::Public).await?;
    let posts = state.posts().list(Audience::Public).await?;

    Ok(HomeTemplate {
        services: services.iter().map(ServiceCard::from).collect(),
        projects: projects
            .iter()
            .take(FEATURED_PROJECTS)
            .map(ProjectCard::from)
            .collect(),
        recent_posts: posts.iter().take(RECENT_POSTS).map(PostSummary::from).collect(),
    })
}
