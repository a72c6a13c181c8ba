//! Command implementations.

pub mod account;
pub mod migrate;

use lumen_core::env::{self, ConfigError};
use lumen_core::{ContentError, EmailError};
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("No account with email {0}")]
    UnknownAccount(String),

    #[error(transparent)]
    Store(ContentError),
}

/// Connect to the database named by `ADMIN_DATABASE_URL` or `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if neither variable is set or the connection fails.
pub async fn connect() -> Result<PgPool, CommandError> {
    let _ = dotenvy::dotenv();

    let database_url = env::database_url("ADMIN_DATABASE_URL")?;
    tracing::info!("Connecting to database...");
    Ok(lumen_core::postgres::create_pool(&database_url).await?)
}
