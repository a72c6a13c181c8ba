//! Blog management: list, editor, publish toggle, delete and comment
//! moderation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lumen_core::content::Audience;
use lumen_core::{CommentId, PostId};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash::{self, Flash};
use crate::middleware::RequireAdmin;
use crate::routes::forms::{DeleteForm, PostForm};
use crate::routes::views::{CommentRow, PostEditor, PostRow};
use crate::state::AppState;

const INDEX: &str = "/admin/blog";

#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub posts: Vec<PostRow>,
    pub flash: Flash,
}

#[derive(Template, WebTemplate)]
#[template(path = "blog/edit.html")]
pub struct BlogEditTemplate {
    pub post: PostEditor,
    pub public_url: Option<String>,
    pub flash: Flash,
}

#[derive(Template, WebTemplate)]
#[template(path = "blog/comments.html")]
pub struct BlogCommentsTemplate {
    pub post: PostRow,
    pub comments: Vec<CommentRow>,
    pub flash: Flash,
}

/// Build the blog router (mounted at `/admin/blog`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/new", get(new))
        .route("/{id}", post(update))
        .route("/{id}/edit", get(edit))
        .route("/{id}/delete", post(delete))
        .route("/{id}/toggle", post(toggle))
        .route("/{id}/comments", get(comments))
        .route("/{id}/comments/{comment_id}/delete", post(delete_comment))
}

fn edit_path(id: PostId) -> String {
    format!("{INDEX}/{id}/edit")
}

/// Every post, drafts included, newest first.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip_all)]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<BlogIndexTemplate> {
    let posts = state.posts().list(Audience::Admin).await?;
    Ok(BlogIndexTemplate {
        posts: posts.iter().map(PostRow::from).collect(),
        flash,
    })
}

/// Empty editor.
#[instrument(skip_all)]
pub async fn new(_admin: RequireAdmin, Query(flash): Query<Flash>) -> BlogEditTemplate {
    BlogEditTemplate {
        post: PostEditor::default(),
        public_url: None,
        flash,
    }
}

/// Create a post authored by the signed-in admin.
///
/// # Errors
///
/// Returns the content store error; invalid input redirects back.
#[instrument(skip(state, form), fields(admin = %admin.email))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<PostForm>,
) -> Result<Response> {
    let draft = form.into_draft(admin.subject_id);
    flash::outcome(
        state.posts().create(&draft).await,
        INDEX,
        "Post created",
        &format!("{INDEX}/new"),
    )
}

/// Editor for an existing post.
///
/// # Errors
///
/// 404 for unknown ids, otherwise the content store error.
#[instrument(skip(state, flash))]
pub async fn edit(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<PostId>,
    Query(flash): Query<Flash>,
) -> Result<BlogEditTemplate> {
    let post = state.posts().get(id).await?;
    let public_url = post
        .publication
        .is_published()
        .then(|| format!("{}/blog/{}", state.config().public_site_url, post.slug));
    Ok(BlogEditTemplate {
        post: PostEditor::from(&post),
        public_url,
        flash,
    })
}

/// Save the editor.
///
/// # Errors
///
/// Returns the content store error; invalid input redirects back.
#[instrument(skip(state, form))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<PostId>,
    Form(form): Form<PostForm>,
) -> Result<Response> {
    let back = edit_path(id);
    flash::outcome(
        state.posts().update(id, &form.into_patch()).await,
        &back,
        "Post saved",
        &back,
    )
}

/// Delete a post and its comments and likes.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state, form))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<PostId>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    if !form.confirmed() {
        return Ok(flash::error(INDEX, "Deletion was not confirmed").into_response());
    }
    flash::outcome(state.posts().delete(id).await, INDEX, "Post deleted", INDEX)
}

/// Publish or unpublish.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state))]
pub async fn toggle(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Response> {
    match state.posts().toggle_publication(id).await {
        Ok(post) => {
            let message = if post.publication.is_published() {
                "Post published"
            } else {
                "Post moved to drafts"
            };
            Ok(flash::notice(INDEX, message).into_response())
        }
        Err(e) => flash::failure(e, INDEX),
    }
}

/// Comments on a post, newest first.
///
/// # Errors
///
/// 404 for unknown posts, otherwise the content store error.
#[instrument(skip(state, flash))]
pub async fn comments(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<PostId>,
    Query(flash): Query<Flash>,
) -> Result<BlogCommentsTemplate> {
    let post = state.posts().get(id).await?;
    let comments = state.comments().list(id).await?;
    Ok(BlogCommentsTemplate {
        post: PostRow::from(&post),
        comments: comments.iter().map(CommentRow::from).collect(),
        flash,
    })
}

/// Remove a comment. A comment id from another post is not found.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state, form))]
pub async fn delete_comment(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(PostId, CommentId)>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    let back = format!("{INDEX}/{id}/comments");
    if !form.confirmed() {
        return Ok(flash::error(&back, "Deletion was not confirmed").into_response());
    }
    flash::outcome(
        state.comments().remove(id, comment_id).await,
        &back,
        "Comment deleted",
        &back,
    )
}
