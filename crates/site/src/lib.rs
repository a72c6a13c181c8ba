//! Lumen public site library.
//!
//! The router is built here so integration tests can drive it in-process
//! with any session store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod flash;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, extract::Request, middleware::from_fn};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::state::AppState;

/// Build the site router with its middleware stack (Sentry layers excluded).
pub fn app<S>(state: AppState, sessions: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(sessions, state.config());
    let static_dir = ServeDir::new(&state.config().static_dir);
    let media_dir = ServeDir::new(&state.config().media_dir);

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .nest_service("/media", media_dir)
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}
