use axum::extract::State;
use axum::Json;

use crate::models::{TrafficRecord, TrafficSummary};
use crate::response::AppError;
use crate::services::analytics;
use crate::state::AppState;

pub async fn traffic(State(state): State<AppState>) -> Result<Json<Vec<TrafficRecord>>, AppError> {
    analytics::get_traffic_growth_data(state.source())
        .await
        .map(Json)
        .map_err(|err| {
            tracing::error!(error = %err, category = "traffic", "traffic query failed");
            AppError::fetch_failed("traffic data")
        })
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<TrafficSummary>, AppError> {
    analytics::get_traffic_summary(state.source())
        .await
        .map(Json)
        .map_err(|err| {
            tracing::error!(error = %err, category = "summary", "summary query failed");
            AppError::fetch_failed("analytics summary")
        })
}
