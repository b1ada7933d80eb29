//! Normalized reporting tables.
//!
//! These four tables describe the record model one row per (year, month[,
//! rank | factor]). The reporting queries in `db::operations` read the wide
//! tables that are loaded out of band instead; nothing here is queried at
//! request time.

use sqlx::PgPool;
use thiserror::Error;

pub const TRAFFIC_DATA: &str = r#"
CREATE TABLE IF NOT EXISTS "traffic_data" (
    "id" VARCHAR PRIMARY KEY DEFAULT gen_random_uuid(),
    "year" INTEGER NOT NULL,
    "month" INTEGER NOT NULL,
    "total_traffic" REAL NOT NULL,
    "normalized_traffic" REAL NOT NULL,
    "delta_percentage" REAL,
    "total_dl_vol" REAL,
    "total_ul_vol" REAL,
    "dl_ul_ratio" REAL
)
"#;

pub const APPLICATION_DATA: &str = r#"
CREATE TABLE IF NOT EXISTS "application_data" (
    "id" VARCHAR PRIMARY KEY DEFAULT gen_random_uuid(),
    "year" INTEGER NOT NULL,
    "month" INTEGER NOT NULL,
    "rank" INTEGER NOT NULL,
    "application" TEXT NOT NULL,
    "application_type" TEXT NOT NULL,
    "data_volume" REAL NOT NULL
)
"#;

pub const DEVICE_DATA: &str = r#"
CREATE TABLE IF NOT EXISTS "device_data" (
    "id" VARCHAR PRIMARY KEY DEFAULT gen_random_uuid(),
    "year" INTEGER NOT NULL,
    "month" INTEGER NOT NULL,
    "rank" INTEGER NOT NULL,
    "device" TEXT NOT NULL,
    "data_volume" REAL NOT NULL
)
"#;

pub const NETWORK_METRICS: &str = r#"
CREATE TABLE IF NOT EXISTS "network_metrics" (
    "id" VARCHAR PRIMARY KEY DEFAULT gen_random_uuid(),
    "year" INTEGER NOT NULL,
    "month" INTEGER NOT NULL,
    "factor" TEXT NOT NULL,
    "value" REAL NOT NULL
)
"#;

pub const MIGRATIONS: &[(&str, &str)] = &[
    ("001_traffic_data", TRAFFIC_DATA),
    ("002_application_data", APPLICATION_DATA),
    ("003_device_data", DEVICE_DATA),
    ("004_network_metrics", NETWORK_METRICS),
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), SchemaError> {
    tracing::info!("ensuring normalized reporting schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS "_migrations" (
            "id" SERIAL PRIMARY KEY,
            "name" TEXT NOT NULL UNIQUE,
            "applied_at" TIMESTAMP NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    let applied: Vec<String> = sqlx::query_scalar(r#"SELECT "name" FROM "_migrations""#)
        .fetch_all(pool)
        .await?;

    for &(name, statement) in MIGRATIONS {
        if applied.iter().any(|a| a == name) {
            tracing::debug!(migration = name, "already applied");
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::query(statement).execute(&mut *tx).await?;
        sqlx::query(r#"INSERT INTO "_migrations" ("name") VALUES ($1)"#)
            .bind(name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(migration = name, "applied");
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema migration failed: {0}")]
    Sqlx(#[from] sqlx::Error),
}
