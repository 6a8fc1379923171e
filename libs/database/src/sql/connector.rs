use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::{info, instrument};

use super::SqlConfig;
use crate::common::{DatabaseError, RetryConfig, retry_with_backoff};

/// Connect with default pool settings
///
/// # Example
/// ```ignore
/// use database::sql::connect;
///
/// let db = connect("sqlite://todo.db?mode=rwc").await?;
/// ```
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    connect_from_config(SqlConfig::new(database_url)).await
}

/// Connect using a SqlConfig
pub async fn connect_from_config(config: SqlConfig) -> Result<DatabaseConnection, DbErr> {
    connect_with_options(config.into_connect_options()).await
}

async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

/// Connect from config, retrying with exponential backoff.
///
/// `None` uses [`RetryConfig::default`].
///
/// # Example
/// ```ignore
/// use database::sql::{SqlConfig, connect_from_config_with_retry};
/// use database::common::RetryConfig;
///
/// let config = SqlConfig::from_env()?;
/// let db = connect_from_config_with_retry(config, Some(RetryConfig::new().with_max_retries(10))).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: SqlConfig,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DatabaseError> {
    let options = config.into_connect_options();

    retry_with_backoff(
        || connect_with_options(options.clone()),
        retry_config.unwrap_or_default(),
    )
    .await
    .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Apply all pending migrations of `M`
///
/// # Example
/// ```ignore
/// use migration::Migrator;
/// use database::sql::run_migrations;
///
/// run_migrations::<Migrator>(&db, "todos").await?;
/// ```
#[instrument(skip(db))]
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DatabaseError> {
    info!("Running database migrations");
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!("Migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::check_health;
    use migration::Migrator;

    fn in_memory() -> SqlConfig {
        // every pooled connection to `sqlite::memory:` is a separate database
        SqlConfig::new("sqlite::memory:").with_pool_size(1, 1)
    }

    #[tokio::test]
    async fn test_connect_and_migrate_sqlite() {
        let db = connect_from_config(in_memory()).await.unwrap();
        run_migrations::<Migrator>(&db, "todos").await.unwrap();
        check_health(&db).await.unwrap();

        // re-running is a no-op
        run_migrations::<Migrator>(&db, "todos").await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_with_retry_gives_up() {
        let config = SqlConfig::new("postgresql://nobody@127.0.0.1:1/none");
        let retry = RetryConfig::new()
            .with_max_retries(1)
            .with_initial_delay(1)
            .without_jitter();

        let err = connect_from_config_with_retry(config, Some(retry))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionFailed(_)));
    }
}
