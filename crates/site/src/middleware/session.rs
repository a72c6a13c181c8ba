//! Visitor sessions.
//!
//! The site has no sign-in. Its session only carries an anonymous visitor
//! id, created the first time a visitor likes a post, so each browser
//! counts once per post.

use lumen_core::VisitorId;
use lumen_core::postgres::SESSION_SCHEMA;
use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "lumen_visitor";

/// Session key holding the visitor id.
pub const VISITOR_ID_KEY: &str = "visitor_id";

/// Session expiry in seconds (30 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// `PostgreSQL` session store in `auth.visitor_session`.
///
/// # Errors
///
/// Returns the store's message if the schema or table name is rejected.
pub fn session_store(pool: &PgPool) -> Result<PostgresStore, String> {
    PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA)?
        .with_table_name("visitor_session")
}

/// Create the session layer over any store (tests use the in-memory one).
#[must_use]
pub fn create_session_layer<S>(store: S, config: &SiteConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The visitor id, if this browser has one yet.
///
/// # Errors
///
/// Returns the session store error.
pub async fn visitor_id(session: &Session) -> Result<Option<VisitorId>, tower_sessions::session::Error> {
    session.get::<VisitorId>(VISITOR_ID_KEY).await
}

/// The visitor id, creating and storing one on first use.
///
/// # Errors
///
/// Returns the session store error.
pub async fn ensure_visitor_id(session: &Session) -> Result<VisitorId, tower_sessions::session::Error> {
    if let Some(id) = visitor_id(session).await? {
        return Ok(id);
    }
    let id = VisitorId::generate();
    session.insert(VISITOR_ID_KEY, id).await?;
    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn test_visitor_id_is_stable() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert!(visitor_id(&session).await.unwrap().is_none());

        let first = ensure_visitor_id(&session).await.unwrap();
        let second = ensure_visitor_id(&session).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(visitor_id(&session).await.unwrap(), Some(first));
    }
}
