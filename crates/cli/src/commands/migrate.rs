//! Database migrations.
//!
//! Migrations live in `crates/core/migrations/` and are embedded at build
//! time; both servers expect them applied before they start.

use sqlx::PgPool;

use super::CommandError;

/// Apply every pending migration.
///
/// # Errors
///
/// Returns the migration error; already applied migrations are skipped.
pub async fn run(pool: &PgPool) -> Result<(), CommandError> {
    tracing::info!("Running migrations...");
    lumen_core::postgres::MIGRATOR.run(pool).await?;
    tracing::info!("Migrations complete!");
    Ok(())
}
