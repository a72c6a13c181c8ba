//! Portfolio management: list, editor, publish toggle, reorder and delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lumen_core::ProjectId;
use lumen_core::content::Audience;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash::{self, Flash};
use crate::middleware::RequireAdmin;
use crate::routes::forms::{DeleteForm, ProjectForm, ReorderForm};
use crate::routes::views::{ProjectEditor, ProjectRow};
use crate::state::AppState;

const INDEX: &str = "/admin/portfolio";

#[derive(Template, WebTemplate)]
#[template(path = "portfolio/index.html")]
pub struct PortfolioIndexTemplate {
    pub projects: Vec<ProjectRow>,
    pub flash: Flash,
}

#[derive(Template, WebTemplate)]
#[template(path = "portfolio/edit.html")]
pub struct PortfolioEditTemplate {
    pub project: ProjectEditor,
    pub flash: Flash,
}

/// Build the portfolio router (mounted at `/admin/portfolio`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/new", get(new))
        .route("/reorder", post(reorder))
        .route("/{id}", post(update))
        .route("/{id}/edit", get(edit))
        .route("/{id}/delete", post(delete))
        .route("/{id}/toggle", post(toggle))
}

/// Every project in display order.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip_all)]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<PortfolioIndexTemplate> {
    let projects = state.projects().list(Audience::Admin).await?;
    Ok(PortfolioIndexTemplate {
        projects: ProjectRow::list(&projects),
        flash,
    })
}

#[instrument(skip_all)]
pub async fn new(_admin: RequireAdmin, Query(flash): Query<Flash>) -> PortfolioEditTemplate {
    PortfolioEditTemplate {
        project: ProjectEditor::default(),
        flash,
    }
}

/// # Errors
///
/// Returns the content store error; invalid input redirects back.
#[instrument(skip(state, form))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<ProjectForm>,
) -> Result<Response> {
    let back = format!("{INDEX}/new");
    let result = match form.into_draft() {
        Ok(draft) => state.projects().create(&draft).await,
        Err(e) => Err(e.into()),
    };
    flash::outcome(result, INDEX, "Project created", &back)
}

/// # Errors
///
/// 404 for unknown ids, otherwise the content store error.
#[instrument(skip(state, flash))]
pub async fn edit(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Query(flash): Query<Flash>,
) -> Result<PortfolioEditTemplate> {
    let project = state.projects().get(id).await?;
    Ok(PortfolioEditTemplate {
        project: ProjectEditor::from(&project),
        flash,
    })
}

/// # Errors
///
/// Returns the content store error; invalid input redirects back.
#[instrument(skip(state, form))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Form(form): Form<ProjectForm>,
) -> Result<Response> {
    let back = format!("{INDEX}/{id}/edit");
    let result = match form.into_patch() {
        Ok(patch) => state.projects().update(id, &patch).await,
        Err(e) => Err(e.into()),
    };
    flash::outcome(result, &back, "Project saved", &back)
}

/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state, form))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    if !form.confirmed() {
        return Ok(flash::error(INDEX, "Deletion was not confirmed").into_response());
    }
    flash::outcome(state.projects().delete(id).await, INDEX, "Project deleted", INDEX)
}

/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state))]
pub async fn toggle(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Response> {
    match state.projects().toggle_publication(id).await {
        Ok(project) => {
            let message = if project.publication.is_published() {
                "Project published"
            } else {
                "Project hidden"
            };
            Ok(flash::notice(INDEX, message).into_response())
        }
        Err(e) => flash::failure(e, INDEX),
    }
}

/// Apply a new display order.
///
/// # Errors
///
/// Returns the content store error; unknown ids redirect back.
#[instrument(skip(state, form))]
pub async fn reorder(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<ReorderForm>,
) -> Result<Response> {
    let result = match form.ids::<ProjectId>() {
        Ok(ids) => state.projects().reorder(&ids).await,
        Err(e) => Err(e.into()),
    };
    flash::outcome(result, INDEX, "Order saved", INDEX)
}
