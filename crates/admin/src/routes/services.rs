//! Service listing management: list, editor, publish toggle, reorder and
//! delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lumen_core::ServiceId;
use lumen_core::content::Audience;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash::{self, Flash};
use crate::middleware::RequireAdmin;
use crate::routes::forms::{DeleteForm, ReorderForm, ServiceForm};
use crate::routes::views::{ServiceEditor, ServiceRow};
use crate::state::AppState;

const INDEX: &str = "/admin/services";

#[derive(Template, WebTemplate)]
#[template(path = "services/index.html")]
pub struct ServicesIndexTemplate {
    pub services: Vec<ServiceRow>,
    pub flash: Flash,
}

#[derive(Template, WebTemplate)]
#[template(path = "services/edit.html")]
pub struct ServiceEditTemplate {
    pub service: ServiceEditor,
    pub flash: Flash,
}

/// Build the services router (mounted at `/admin/services`).
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

/// Every service in display order.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip_all)]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<ServicesIndexTemplate> {
    let services = state.services().list(Audience::Admin).await?;
    Ok(ServicesIndexTemplate {
        services: ServiceRow::list(&services),
        flash,
    })
}

#[instrument(skip_all)]
pub async fn new(_admin: RequireAdmin, Query(flash): Query<Flash>) -> ServiceEditTemplate {
    ServiceEditTemplate {
        service: ServiceEditor::default(),
        flash,
    }
}

/// # Errors
///
/// Returns the content store error; invalid input and duplicate titles
/// redirect back.
#[instrument(skip(state, form))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<ServiceForm>,
) -> Result<Response> {
    let back = format!("{INDEX}/new");
    let result = match form.into_draft() {
        Ok(draft) => state.services().create(&draft).await,
        Err(e) => Err(e.into()),
    };
    flash::outcome(result, INDEX, "Service created", &back)
}

/// # Errors
///
/// 404 for unknown ids, otherwise the content store error.
#[instrument(skip(state, flash))]
pub async fn edit(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
    Query(flash): Query<Flash>,
) -> Result<ServiceEditTemplate> {
    let service = state.services().get(id).await?;
    Ok(ServiceEditTemplate {
        service: ServiceEditor::from(&service),
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
    Path(id): Path<ServiceId>,
    Form(form): Form<ServiceForm>,
) -> Result<Response> {
    let back = format!("{INDEX}/{id}/edit");
    let result = match form.into_patch() {
        Ok(patch) => state.services().update(id, &patch).await,
        Err(e) => Err(e.into()),
    };
    flash::outcome(result, &back, "Service saved", &back)
}

/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state, form))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    if !form.confirmed() {
        return Ok(flash::error(INDEX, "Deletion was not confirmed").into_response());
    }
    flash::outcome(state.services().delete(id).await, INDEX, "Service deleted", INDEX)
}

/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state))]
pub async fn toggle(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
) -> Result<Response> {
    match state.services().toggle_publication(id).await {
        Ok(service) => {
            let message = if service.publication.is_published() {
                "Service published"
            } else {
                "Service hidden"
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
    let result = match form.ids::<ServiceId>() {
        Ok(ids) => state.services().reorder(&ids).await,
        Err(e) => Err(e.into()),
    };
    flash::outcome(result, INDEX, "Order saved", INDEX)
}
