use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::db::DatabaseProxy;
use crate::models::{ApplicationRecord, DeviceRecord, JULY, REPORT_YEAR};
use crate::services::growth::{Period, PeriodVolume};

/// June (previous) and July (current) application volumes in long format.
pub async fn fetch_application_volumes(
    proxy: &DatabaseProxy,
) -> Result<Vec<PeriodVolume>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT "application" AS "name", 'previous' AS "period", "june_data"::float8 AS "volume"
        FROM "monthly_application_data"
        UNION ALL
        SELECT "application" AS "name", 'current' AS "period", "july_data"::float8 AS "volume"
        FROM "monthly_application_data"
        "#,
    )
    .fetch_all(proxy.pool())
    .await?;

    Ok(rows.iter().filter_map(decode_period_volume).collect())
}

/// May (previous) and June (current) device volumes in long format.
pub async fn fetch_device_volumes(proxy: &DatabaseProxy) -> Result<Vec<PeriodVolume>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT "device" AS "name", 'previous' AS "period", "may_data"::float8 AS "volume"
        FROM "monthly_device_data"
        UNION ALL
        SELECT "device" AS "name", 'current' AS "period", "june_data"::float8 AS "volume"
        FROM "monthly_device_data"
        "#,
    )
    .fetch_all(proxy.pool())
    .await?;

    Ok(rows.iter().filter_map(decode_period_volume).collect())
}

/// Highest-volume July applications. The wide table has no type column, so
/// `application_type` is left empty.
pub async fn fetch_top_july_applications(
    proxy: &DatabaseProxy,
    limit: usize,
) -> Result<Vec<ApplicationRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            "application" AS "name",
            "july_data"::float8 AS "volume",
            (ROW_NUMBER() OVER (ORDER BY "july_data" DESC))::int4 AS "rank"
        FROM "monthly_application_data"
        WHERE "july_data" IS NOT NULL
        ORDER BY "july_data" DESC
        LIMIT $1
        "#,
    )
    .bind(limit as i64)
    .fetch_all(proxy.pool())
    .await?;

    Ok(rows
        .iter()
        .filter_map(decode_ranked)
        .map(|(name, rank, volume)| ApplicationRecord {
            year: REPORT_YEAR,
            month: JULY,
            rank,
            application: name,
            application_type: String::new(),
            data_volume: volume,
        })
        .collect())
}

pub async fn fetch_top_july_devices(
    proxy: &DatabaseProxy,
    limit: usize,
) -> Result<Vec<DeviceRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            "device" AS "name",
            "july_data"::float8 AS "volume",
            (ROW_NUMBER() OVER (ORDER BY "july_data" DESC))::int4 AS "rank"
        FROM "monthly_device_data"
        WHERE "july_data" IS NOT NULL
        ORDER BY "july_data" DESC
        LIMIT $1
        "#,
    )
    .bind(limit as i64)
    .fetch_all(proxy.pool())
    .await?;

    Ok(rows
        .iter()
        .filter_map(decode_ranked)
        .map(|(name, rank, volume)| DeviceRecord {
            year: REPORT_YEAR,
            month: JULY,
            rank,
            device: name,
            data_volume: volume,
        })
        .collect())
}

fn decode_ranked(row: &PgRow) -> Option<(String, u32, f64)> {
    let name: String = row.try_get("name").ok()?;
    let rank: i32 = row.try_get("rank").ok()?;
    let volume: f64 = row.try_get("volume").ok()?;
    Some((name, u32::try_from(rank).ok()?, volume))
}

fn decode_period_volume(row: &PgRow) -> Option<PeriodVolume> {
    let name: String = row.try_get("name").ok()?;
    let period: String = row.try_get("period").ok()?;
    Some(PeriodVolume {
        name,
        period: Period::parse(&period)?,
        volume: row.try_get::<Option<f64>, _>("volume").ok().flatten(),
    })
}
