//! PostgreSQL implementation of the store traits.
//!
//! # Tables
//!
//! - `account` - Sign-in identities, Argon2id hashes and role claims
//! - `blog_post` - Blog posts (Markdown body)
//! - `portfolio_project` - Portfolio case studies
//! - `service` - Service listings
//! - `blog_comment` - Reader comments, cascade-deleted with their post
//! - `post_like` - One row per (post, visitor) like
//! - `contact_message` - Contact form submissions
//! - `auth.admin_session` / `auth.visitor_session` - tower-sessions records
//!
//! # Migrations
//!
//! Migrations are stored in `crates/core/migrations/` and run via:
//! ```bash
//! cargo run -p lumen-cli -- migrate
//! ```

mod accounts;
mod comments;
mod likes;
mod messages;
mod posts;
mod projects;
mod services;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::error::ContentError;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Schema holding the session tables.
pub const SESSION_SCHEMA: &str = "auth";

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    pool_options().connect(database_url.expose_secret()).await
}

/// Pool that connects on first use. Lets a server start (and answer
/// liveness checks) before the database is reachable.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL cannot be parsed.
pub fn create_lazy_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    pool_options().connect_lazy(database_url.expose_secret())
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(0)
        .acquire_timeout(Duration::from_secs(10))
}

/// Every store trait over one connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip to the database, for readiness checks.
    ///
    /// # Errors
    ///
    /// `Unavailable` when the database does not answer.
    pub async fn ping(&self) -> Result<(), ContentError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Write display positions for `ordered` in one statement, inside a
/// transaction that is rolled back if any id is unknown.
async fn reorder_table(
    pool: &PgPool,
    table: &'static str,
    ordered: Vec<Uuid>,
) -> Result<(), ContentError> {
    let expected = u64::try_from(ordered.len()).unwrap_or(u64::MAX);
    let sql = format!(
        "UPDATE {table} AS t \
         SET display_order = (o.position - 1)::int \
         FROM UNNEST($1::uuid[]) WITH ORDINALITY AS o(id, position) \
         WHERE t.id = o.id"
    );

    let mut tx = pool.begin().await?;
    let result = sqlx::query(&sql).bind(ordered).execute(&mut *tx).await?;
    if result.rows_affected() != expected {
        tx.rollback().await?;
        return Err(ContentError::NotFound);
    }
    tx.commit().await?;
    Ok(())
}
