//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, one transaction per request)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (`x-request-id`)
//! 4. Security headers (stricter CSP, no caching)
//! 5. Session layer (tower-sessions with `PostgreSQL` store, signed cookie)
//!
//! Authentication is not a layer: protected handlers take the
//! [`RequireAdmin`] extractor, which resolves the session once per request.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AdminAuthRejection, AuthContext, RequireAdmin, sign_in, sign_out};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{cookie_key, create_session_layer, session_store};
