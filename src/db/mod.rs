pub mod config;
pub mod operations;
pub mod schema;

use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::config::DbConfig;

const PING_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct DatabaseProxy {
    pool: PgPool,
}

impl DatabaseProxy {
    pub async fn connect(config: DbConfig) -> Result<Arc<Self>, DbInitError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        tracing::info!(url = %config.redacted_url(), "database connected");

        if config.run_migrations {
            schema::ensure_schema(&pool).await?;
        }

        Ok(Arc::new(Self { pool }))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trips `SELECT 1`; returns the latency.
    pub async fn ping(&self) -> Result<Duration, DbPingError> {
        let started = Instant::now();
        match tokio::time::timeout(PING_TIMEOUT, sqlx::query("SELECT 1").execute(&self.pool)).await
        {
            Ok(Ok(_)) => Ok(started.elapsed()),
            Ok(Err(err)) => Err(DbPingError::Sqlx(err)),
            Err(_) => Err(DbPingError::Timeout),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Schema(#[from] schema::SchemaError),
}

#[derive(Debug, Error)]
pub enum DbPingError {
    #[error("database ping timed out")]
    Timeout,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
