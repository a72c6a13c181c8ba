//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Readiness (database)
//! GET  /                                - Redirect to /admin
//!
//! # Auth (public)
//! GET  /admin/login                     - Sign-in and sign-up forms
//! POST /admin/login                     - Sign in
//! POST /admin/signup                    - Create an account (no access until granted)
//! POST /admin/logout                    - Sign out
//!
//! # Dashboard (admin only, as is everything below)
//! GET  /admin                           - Content counts and unread messages
//!
//! # Blog
//! GET  /admin/blog                      - All posts, drafts included
//! GET  /admin/blog/new                  - Editor for a new post
//! POST /admin/blog                      - Create
//! GET  /admin/blog/{id}/edit            - Editor
//! POST /admin/blog/{id}                 - Update
//! POST /admin/blog/{id}/toggle          - Publish / unpublish
//! POST /admin/blog/{id}/delete          - Delete (confirm=yes)
//! GET  /admin/blog/{id}/comments        - Comment moderation
//! POST /admin/blog/{id}/comments/{cid}/delete
//!
//! # Portfolio and services (same shape as blog, plus ordering)
//! GET  /admin/portfolio                 /admin/services
//! POST /admin/portfolio/reorder         /admin/services/reorder
//!
//! # Messages
//! GET  /admin/messages                  - Inbox, newest first
//! GET  /admin/messages/{id}             - Read (marks as read)
//! POST /admin/messages/{id}/delete      - Delete (confirm=yes)
//!
//! # JSON API (401/403 instead of redirects)
//! POST /admin/api/media                 - Image upload (multipart `file`)
//! POST /admin/api/preview               - Markdown preview
//! ```

pub mod api;
pub mod auth;
pub mod blog;
pub mod dashboard;
pub mod forms;
pub mod health;
pub mod messages;
pub mod portfolio;
pub mod services;
pub mod views;

use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

/// Routes under `/admin`.
fn admin_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .merge(auth::router())
        .nest("/blog", blog::router())
        .nest("/portfolio", portfolio::router())
        .nest("/services", services::router())
        .nest("/messages", messages::router())
        .nest("/api", api::router(max_upload_bytes))
}

/// Create all routes for the admin.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/", get(|| async { Redirect::permanent("/admin") }))
        .nest("/admin", admin_routes(max_upload_bytes))
}
