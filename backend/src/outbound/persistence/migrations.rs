//! Embedded schema migrations applied at server start.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    #[error("failed to apply migrations: {0}")]
    Apply(String),
}

/// Apply pending migrations over a dedicated synchronous connection.
///
/// Blocking; call from `spawn_blocking` or before the runtime starts serving.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply(err.to_string()))?;
    info!(count = applied.len(), "database migrations applied");
    Ok(())
}
