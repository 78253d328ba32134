//! Postgres pool and schema
//!
//! Both services connect to the same database. The schema for the `users` and
//! `configurations` tables is embedded from `common/migrations` at compile
//! time and applied by whichever service starts first.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Startup failures talking to the database
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Schema migration failed: {0}")]
    Migrate(#[from] MigrateError),
}

/// Open the shared connection pool
pub async fn create_pool(config: &Config) -> Result<PgPool, DbError> {
    let url = config.database_url_masked();

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .connect(&config.database_url)
        .await
        .map_err(|source| DbError::Connect {
            url: url.clone(),
            source,
        })?;

    tracing::info!(
        database = %url,
        max_connections = config.db_max_connections,
        "Database pool ready"
    );

    Ok(pool)
}

/// Bring the schema up to date
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    MIGRATOR.run(pool).await?;
    tracing::info!(known = MIGRATOR.iter().count(), "Schema up to date");
    Ok(())
}

/// Whether the database answers a trivial query. Failures are logged here
/// and never returned, so callers can't leak driver detail.
pub async fn is_reachable(pool: &PgPool) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    }
}
