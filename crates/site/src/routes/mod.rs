//! HTTP route handlers for the public site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                      - Home page
//! GET  /services              - Service listings
//! GET  /about                 - About page (Markdown)
//! GET  /privacy               - Privacy policy (Markdown)
//! GET  /refund-policy         - Refund policy (Markdown)
//! GET  /contact               - Contact form
//! POST /contact               - Submit contact form (rate limited)
//!
//! # Blog
//! GET  /blog                  - Published posts, newest first
//! GET  /blog/{slug}           - Published post (404 for drafts)
//! POST /blog/{slug}/comments  - Add a comment (rate limited)
//! POST /blog/{slug}/like      - Toggle this visitor's like (rate limited)
//!
//! # Probes
//! GET  /health                - Liveness
//! GET  /health/ready          - Readiness (database)
//! ```

pub mod blog;
pub mod contact;
pub mod health;
pub mod home;
pub mod pages;
pub mod services;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::form_rate_limiter;
use crate::state::AppState;

/// Form endpoints, behind the rate limiter.
fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(contact::submit))
        .route("/blog/{slug}/comments", post(blog::comment))
        .route("/blog/{slug}/like", post(blog::like))
        .layer(form_rate_limiter())
}

/// Create the blog read routes.
fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{slug}", get(blog::show))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/services", get(services::index))
        .route("/contact", get(contact::show))
        .nest("/blog", blog_routes())
        .merge(pages::router())
        .merge(form_routes())
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
