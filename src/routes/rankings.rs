use axum::extract::State;
use axum::Json;

use crate::models::{ApplicationGrowth, DeviceGrowth};
use crate::response::AppError;
use crate::services::analytics;
use crate::state::AppState;

pub async fn applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationGrowth>>, AppError> {
    match analytics::get_application_data(state.source(), state.options()).await {
        Ok(rows) => Ok(Json(rows)),
        Err(err) => {
            tracing::error!(error = %err, category = "applications", "application query failed");
            Err(AppError::fetch_failed("application data"))
        }
    }
}

pub async fn devices(State(state): State<AppState>) -> Result<Json<Vec<DeviceGrowth>>, AppError> {
    match analytics::get_device_data(state.source()).await {
        Ok(rows) => Ok(Json(rows)),
        Err(err) => {
            tracing::error!(error = %err, category = "devices", "device query failed");
            Err(AppError::fetch_failed("device data"))
        }
    }
}
