//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use lumen_core::messages::InboxCounts;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash::Flash;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Collection sizes shown on the dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardCounts {
    pub posts: i64,
    pub projects: i64,
    pub services: i64,
    pub messages: InboxCounts,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_email: String,
    pub counts: DashboardCounts,
    pub flash: Flash,
}

/// Dashboard page.
///
/// GET /admin
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip_all)]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<DashboardTemplate> {
    let posts = state.posts();
    let projects = state.projects();
    let services = state.services();
    let inbox = state.inbox();

    let (posts, projects, services, messages) = tokio::try_join!(
        posts.count(),
        projects.count(),
        services.count(),
        inbox.counts(),
    )?;

    Ok(DashboardTemplate {
        admin_email: admin.email.to_string(),
        counts: DashboardCounts {
            posts,
            projects,
            services,
            messages,
        },
        flash,
    })
}
