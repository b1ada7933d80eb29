use sqlx::Row;

use crate::db::DatabaseProxy;
use crate::models::PrefectureRecord;

pub async fn fetch_top_prefectures(
    proxy: &DatabaseProxy,
    limit: usize,
) -> Result<Vec<PrefectureRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT "prefecture", "data_volume"::float8 AS "data_volume"
        FROM "prefecture_data"
        WHERE "data_volume" IS NOT NULL
        ORDER BY "data_volume" DESC
        LIMIT $1
        "#,
    )
    .bind(limit as i64)
    .fetch_all(proxy.pool())
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|r| {
            Some(PrefectureRecord {
                prefecture: r.try_get("prefecture").ok()?,
                data_volume: r.try_get("data_volume").unwrap_or(0.0),
            })
        })
        .collect())
}
