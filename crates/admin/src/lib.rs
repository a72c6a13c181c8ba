//! Lumen admin library.
//!
//! Content management for the agency site: blog posts, portfolio projects,
//! service listings, comment moderation and the contact inbox.
//!
//! # Security
//!
//! Every route under `/admin` except sign-in requires an account holding
//! the admin role. Accounts are created by sign-up but only gain access
//! through `lumen account grant`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod flash;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request, middleware::from_fn, response::Response};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionStore, cookie::Key};
use tracing::Span;

use crate::state::AppState;

/// Build the admin router with its middleware stack (Sentry layers excluded).
pub fn app<S>(state: AppState, sessions: S, key: Key) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(sessions, state.config(), key);
    let static_dir = ServeDir::new(&state.config().static_dir);
    let max_upload_bytes = state.media().max_bytes();

    Router::new()
        .merge(routes::routes(max_upload_bytes))
        .nest_service("/static", static_dir)
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
