use axum::extract::State;
use axum::Json;

use crate::models::{CellTypeGrowth, PrefectureRecord};
use crate::response::AppError;
use crate::services::analytics;
use crate::state::AppState;

pub async fn prefectures(
    State(state): State<AppState>,
) -> Result<Json<Vec<PrefectureRecord>>, AppError> {
    match analytics::get_prefecture_data(state.source(), state.options()).await {
        Ok(rows) => Ok(Json(rows)),
        Err(err) => {
            tracing::error!(error = %err, category = "prefectures", "prefecture query failed");
            Err(AppError::fetch_failed("prefecture data"))
        }
    }
}

pub async fn cell_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<CellTypeGrowth>>, AppError> {
    match analytics::get_cell_type_growth(state.source()).await {
        Ok(rows) => Ok(Json(rows)),
        Err(err) => {
            tracing::error!(error = %err, category = "cell-types", "cell type query failed");
            Err(AppError::fetch_failed("cell type data"))
        }
    }
}
