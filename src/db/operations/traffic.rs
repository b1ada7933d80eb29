use sqlx::Row;

use crate::db::DatabaseProxy;
use crate::models::{TrafficRecord, JULY, JUNE};

/// July and June sums of total and normalized traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryRow {
    pub july_traffic: f64,
    pub june_traffic: f64,
    pub july_normalized: f64,
    pub june_normalized: f64,
}

pub async fn fetch_traffic_rows(proxy: &DatabaseProxy) -> Result<Vec<TrafficRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            u."agg_year"::int4 AS "year",
            u."agg_month"::int4 AS "month",
            u."total_traffic"::float8 AS "total_traffic",
            m."total_normalized_traffic"::float8 AS "normalized_traffic",
            u."total_dl_vol"::float8 AS "total_dl_vol",
            u."total_ul_vol"::float8 AS "total_ul_vol",
            u."dl_ul_ratio"::float8 AS "dl_ul_ratio"
        FROM "ul_dl_traffic_data" u
        JOIN "monthly_traffic_data" m
          ON u."agg_year" = m."year" AND u."agg_month" = m."month"
        ORDER BY u."agg_year" ASC, u."agg_month" ASC
        "#,
    )
    .fetch_all(proxy.pool())
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|r| {
            let year: i32 = r.try_get("year").ok()?;
            let month: i32 = r.try_get("month").ok()?;
            Some(TrafficRecord {
                year,
                month: u32::try_from(month).ok()?,
                total_traffic: r
                    .try_get::<Option<f64>, _>("total_traffic")
                    .ok()
                    .flatten()
                    .unwrap_or(0.0),
                normalized_traffic: r
                    .try_get::<Option<f64>, _>("normalized_traffic")
                    .ok()
                    .flatten()
                    .unwrap_or(0.0),
                delta_percentage: None,
                total_dl_vol: r.try_get::<Option<f64>, _>("total_dl_vol").ok().flatten(),
                total_ul_vol: r.try_get::<Option<f64>, _>("total_ul_vol").ok().flatten(),
                dl_ul_ratio: r.try_get::<Option<f64>, _>("dl_ul_ratio").ok().flatten(),
            })
        })
        .collect())
}

pub async fn fetch_summary_row(proxy: &DatabaseProxy) -> Result<SummaryRow, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN m."month" = $1 THEN u."total_traffic" END), 0)::float8 AS "july_traffic",
            COALESCE(SUM(CASE WHEN m."month" = $2 THEN u."total_traffic" END), 0)::float8 AS "june_traffic",
            COALESCE(SUM(CASE WHEN m."month" = $1 THEN m."total_normalized_traffic" END), 0)::float8 AS "july_normalized",
            COALESCE(SUM(CASE WHEN m."month" = $2 THEN m."total_normalized_traffic" END), 0)::float8 AS "june_normalized"
        FROM "ul_dl_traffic_data" u
        JOIN "monthly_traffic_data" m
          ON u."agg_year" = m."year" AND u."agg_month" = m."month"
        WHERE m."month" IN ($1, $2)
        "#,
    )
    .bind(JULY as i32)
    .bind(JUNE as i32)
    .fetch_optional(proxy.pool())
    .await?;

    let Some(row) = row else {
        return Ok(SummaryRow::default());
    };

    Ok(SummaryRow {
        july_traffic: row.try_get("july_traffic").unwrap_or(0.0),
        june_traffic: row.try_get("june_traffic").unwrap_or(0.0),
        july_normalized: row.try_get("july_normalized").unwrap_or(0.0),
        june_normalized: row.try_get("june_normalized").unwrap_or(0.0),
    })
}
