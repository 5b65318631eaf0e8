//! PostgreSQL storage backend.

mod postgres_repository;


pub use postgres_repository::PostgresRepository;

use crate::config::DatabaseConfig;
use crate::domain::RepositoryPtr;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Pause between connection attempts at startup.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Open the pool, retrying while the database comes up, then apply migrations.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let options = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout);

    let attempts = config.retry_count.max(1);
    let mut attempt = 1;
    let pool = loop {
        match options.clone().connect(&config.database_url).await {
            Ok(pool) => break pool,
            Err(err) if attempt < attempts => {
                tracing::warn!(attempt, attempts, "database not ready: {err}");
                attempt += 1;
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) => {
                return Err(err).context(format!("database unreachable after {attempts} attempts"))
            }
        }
    };

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to apply database migrations")?;

    tracing::info!("database ready");
    Ok(pool)
}

/// Wrap a connected pool in the repository trait object.
pub fn create_postgres_repository(pool: PgPool) -> RepositoryPtr {
    Arc::new(PostgresRepository::new(pool))
}
