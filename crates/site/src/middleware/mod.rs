//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, one transaction per request)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (`x-request-id`, recorded on the span and Sentry scope)
//! 4. Security headers
//! 5. Session layer (tower-sessions, visitor id for likes)
//! 6. Rate limiting on the form endpoints (governor)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use rate_limit::form_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, ensure_visitor_id, session_store, visitor_id};
