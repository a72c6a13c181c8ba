//! Session middleware configuration for admin.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions with
//! stricter security settings than the public site (SameSite=Strict, 24hr
//! expiry, signed cookie).

use argon2::Argon2;
use lumen_core::postgres::SESSION_SCHEMA;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "lumen_admin";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Fixed salt for deriving the cookie key from the session secret.
const COOKIE_KEY_SALT: &[u8] = b"lumen-admin-cookie-key";

/// `PostgreSQL` session store in `auth.admin_session`.
///
/// # Errors
///
/// Returns the store's message if the schema or table name is rejected.
pub fn session_store(pool: &PgPool) -> Result<PostgresStore, String> {
    PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA)?
        .with_table_name("admin_session")
}

/// Derive the 64-byte cookie signing key from `ADMIN_SESSION_SECRET`.
///
/// # Errors
///
/// Returns a message if key derivation fails.
pub fn cookie_key(secret: &SecretString) -> Result<Key, String> {
    let mut bytes = [0u8; 64];
    Argon2::default()
        .hash_password_into(secret.expose_secret().as_bytes(), COOKIE_KEY_SALT, &mut bytes)
        .map_err(|e| format!("failed to derive cookie key: {e}"))?;
    Key::try_from(bytes.as_slice()).map_err(|e| format!("invalid cookie key: {e}"))
}

/// Create the session layer over any store (tests use the in-memory one).
#[must_use]
pub fn create_session_layer<S>(
    store: S,
    config: &AdminConfig,
    key: Key,
) -> SessionManagerLayer<S, SignedCookie>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
