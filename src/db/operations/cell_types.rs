use sqlx::Row;

use crate::db::DatabaseProxy;
use crate::models::CellTypeRecord;

pub async fn fetch_cell_types(proxy: &DatabaseProxy) -> Result<Vec<CellTypeRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            "cell_type",
            COALESCE("june_data", 0)::float8 AS "june_data",
            COALESCE("july_data", 0)::float8 AS "july_data"
        FROM "monthly_cell_type_data"
        "#,
    )
    .fetch_all(proxy.pool())
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|r| {
            Some(CellTypeRecord {
                cell_type: r.try_get("cell_type").ok()?,
                previous: r.try_get("june_data").unwrap_or(0.0),
                current: r.try_get("july_data").unwrap_or(0.0),
            })
        })
        .collect())
}
