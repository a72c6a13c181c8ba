//! Blog route handlers: index, post page, comments and likes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, header::ACCEPT},
    response::{IntoResponse, Redirect, Response},
};
use lumen_core::ContentError;
use lumen_core::content::{Audience, BlogPost};
use lumen_core::likes::LikeTally;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{self, Flash};
use crate::middleware::{ensure_visitor_id, visitor_id};
use crate::routes::contact::capitalize;
use crate::routes::views::{CommentView, PostSummary, PostView};
use crate::state::AppState;

/// Number of other posts shown under a post.
const RECENT_POSTS_COUNT: usize = 3;

#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub posts: Vec<PostSummary>,
}

#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub likes: LikeTally,
    pub recent_posts: Vec<PostSummary>,
    pub flash: Flash,
}

/// Comment form fields.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: String,
}

/// Resolve a slug to a published post, or 404.
async fn published_post(state: &AppState, slug: &str) -> Result<BlogPost> {
    state
        .posts()
        .find_published(slug)
        .await?
        .ok_or(AppError::NotFound)
}

/// Display the blog index: published posts, newest first.
///
/// # Errors
///
/// Returns the content store error.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let posts = state.posts().list(Audience::Public).await?;
    Ok(BlogIndexTemplate {
        posts: posts.iter().map(PostSummary::from).collect(),
    })
}

/// Display a single published post with its comments and likes.
///
/// # Errors
///
/// 404 for drafts and unknown slugs, otherwise the store error.
#[instrument(skip(state, session, flash))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(flash): Query<Flash>,
    session: Session,
) -> Result<impl IntoResponse> {
    let post = published_post(&state, &slug).await?;

    let comments = state.comments().list(post.id).await?;
    let visitor = visitor_id(&session).await?;
    let likes = state.likes().tally(post.id, visitor).await?;

    let recent_posts = state
        .posts()
        .list(Audience::Public)
        .await?
        .iter()
        .filter(|other| other.id != post.id)
        .take(RECENT_POSTS_COUNT)
        .map(PostSummary::from)
        .collect();

    Ok(BlogShowTemplate {
        post: PostView::from(&post),
        comments: comments.iter().map(CommentView::from).collect(),
        likes,
        recent_posts,
        flash,
    })
}

/// Add a comment to a published post.
///
/// Invalid input redirects back to the comment form with the reason and
/// writes nothing.
///
/// # Errors
///
/// 404 for drafts and unknown slugs, otherwise the store error.
#[instrument(skip(state, form))]
pub async fn comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Response> {
    let post = published_post(&state, &slug).await?;
    let back = format!("/blog/{}#comments", post.slug);

    match state.comments().submit(post.id, &form.name, &form.comment).await {
        Ok(_) => Ok(flash::notice(&back, "Thanks! Your comment is live.").into_response()),
        Err(ContentError::Validation(e)) => {
            Ok(flash::error(&back, &capitalize(&e.to_string())).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Like a post, or take the like back.
///
/// Answers JSON for `Accept: application/json` (the like button script),
/// otherwise redirects back to the post.
///
/// # Errors
///
/// 404 for drafts and unknown slugs, otherwise the session or store error.
#[instrument(skip(state, session, headers))]
pub async fn like(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let post = published_post(&state, &slug).await?;
    let visitor = ensure_visitor_id(&session).await?;
    let tally = state.likes().toggle(post.id, visitor).await?;

    let wants_json = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"));

    if wants_json {
        Ok(Json(tally).into_response())
    } else {
        Ok(Redirect::to(&format!("/blog/{}#likes", post.slug)).into_response())
    }
}
