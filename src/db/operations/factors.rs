use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::db::DatabaseProxy;
use crate::models::{Factor, REPORT_YEAR};

/// Column names of the twelve month columns in `monthly_factor_data`, January first.
pub const MONTH_COLUMNS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// One wide `monthly_factor_data` row.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorRow {
    pub factor: Factor,
    pub year: i32,
    pub months: [Option<f64>; 12],
}

impl FactorRow {
    /// Value for a calendar month (1-based), `0` when absent.
    pub fn month_value(&self, month: u32) -> f64 {
        month
            .checked_sub(1)
            .and_then(|idx| self.months.get(idx as usize).copied().flatten())
            .unwrap_or(0.0)
    }
}

const FACTOR_COLUMNS: &str = r#"
    "factor",
    "year"::int4 AS "year",
    "jan"::float8 AS "jan", "feb"::float8 AS "feb", "mar"::float8 AS "mar",
    "apr"::float8 AS "apr", "may"::float8 AS "may", "jun"::float8 AS "jun",
    "jul"::float8 AS "jul", "aug"::float8 AS "aug", "sep"::float8 AS "sep",
    "oct"::float8 AS "oct", "nov"::float8 AS "nov", "dec"::float8 AS "dec"
"#;

pub async fn fetch_factor_row(
    proxy: &DatabaseProxy,
    factor: Factor,
) -> Result<Option<FactorRow>, sqlx::Error> {
    let sql = format!(
        r#"SELECT {FACTOR_COLUMNS} FROM "monthly_factor_data" WHERE "factor" = $1 ORDER BY "year" DESC LIMIT 1"#
    );
    let row = sqlx::query(&sql)
        .bind(factor.as_str())
        .fetch_optional(proxy.pool())
        .await?;

    Ok(row.as_ref().and_then(decode_factor_row))
}

pub async fn fetch_all_factor_rows(proxy: &DatabaseProxy) -> Result<Vec<FactorRow>, sqlx::Error> {
    let sql = format!(
        r#"SELECT {FACTOR_COLUMNS} FROM "monthly_factor_data" ORDER BY "factor" ASC, "year" ASC"#
    );
    let rows = sqlx::query(&sql).fetch_all(proxy.pool()).await?;

    Ok(rows.iter().filter_map(decode_factor_row).collect())
}

fn decode_factor_row(row: &PgRow) -> Option<FactorRow> {
    let label: String = row.try_get("factor").ok()?;
    let Some(factor) = Factor::parse(&label) else {
        tracing::debug!(factor = %label, "skipping unknown factor row");
        return None;
    };

    let year = row
        .try_get::<Option<i32>, _>("year")
        .ok()
        .flatten()
        .unwrap_or(REPORT_YEAR);

    let mut months = [None; 12];
    for (slot, column) in months.iter_mut().zip(MONTH_COLUMNS) {
        *slot = row.try_get::<Option<f64>, _>(column).ok().flatten();
    }

    Some(FactorRow {
        factor,
        year,
        months,
    })
}
