//! Contact message inbox.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lumen_core::MessageId;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash::{self, Flash};
use crate::middleware::RequireAdmin;
use crate::routes::forms::DeleteForm;
use crate::routes::views::{MessageRow, short_datetime};
use crate::state::AppState;

const INDEX: &str = "/admin/messages";

#[derive(Template, WebTemplate)]
#[template(path = "messages/index.html")]
pub struct MessagesIndexTemplate {
    pub messages: Vec<MessageRow>,
    pub unread: usize,
    pub flash: Flash,
}

/// A single message, shown in full.
#[derive(Debug, Clone)]
pub struct MessageView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub received_on: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "messages/show.html")]
pub struct MessageShowTemplate {
    pub message: MessageView,
    pub flash: Flash,
}

/// Build the inbox router (mounted at `/admin/messages`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{id}", get(show))
        .route("/{id}/delete", post(delete))
}

/// Every message, newest first.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip_all)]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<MessagesIndexTemplate> {
    let messages: Vec<MessageRow> = state
        .inbox()
        .list()
        .await?
        .iter()
        .map(MessageRow::from)
        .collect();
    let unread = messages.iter().filter(|m| !m.read).count();
    Ok(MessagesIndexTemplate {
        messages,
        unread,
        flash,
    })
}

/// Open a message, marking it read.
///
/// # Errors
///
/// 404 for unknown ids, otherwise the content store error.
#[instrument(skip(state, flash))]
pub async fn show(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<MessageId>,
    Query(flash): Query<Flash>,
) -> Result<MessageShowTemplate> {
    let message = state.inbox().open(id).await?;
    Ok(MessageShowTemplate {
        message: MessageView {
            id: message.id.to_string(),
            name: message.name,
            email: message.email.to_string(),
            message: message.message,
            received_on: short_datetime(message.created_at),
        },
        flash,
    })
}

/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state, form))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<MessageId>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    if !form.confirmed() {
        return Ok(flash::error(&format!("{INDEX}/{id}"), "Deletion was not confirmed").into_response());
    }
    flash::outcome(state.inbox().remove(id).await, INDEX, "Message deleted", INDEX)
}
