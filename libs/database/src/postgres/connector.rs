use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::error::{DatabaseError, DatabaseResult};
use crate::retry::{RetryConfig, retry_with_backoff};

/// Opens a pool with `config`'s settings. One attempt.
pub async fn connect(config: &PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.connect_options()).await?;
    info!(url = %config.redacted_url(), "Connected to PostgreSQL");
    Ok(db)
}

/// [`connect`] with exponential backoff, for databases still starting up.
pub async fn connect_with_retry(
    config: &PostgresConfig,
    retry: &RetryConfig,
) -> DatabaseResult<DatabaseConnection> {
    let db = retry_with_backoff(|| connect(config), retry).await?;
    Ok(db)
}

/// Applies all pending migrations of `M`.
pub async fn run_migrations<M: MigratorTrait>(db: &DatabaseConnection) -> DatabaseResult<()> {
    info!("Running database migrations");
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Migrations complete");
    Ok(())
}
