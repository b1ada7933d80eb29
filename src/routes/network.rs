use axum::extract::State;
use axum::Json;

use crate::models::{AllGrowth, NetworkGrowth, NetworkMetricRecord, RoamingData};
use crate::response::AppError;
use crate::services::analytics::{self, AnalyticsError};
use crate::state::AppState;

fn failed(category: &'static str, label: &str, err: AnalyticsError) -> AppError {
    tracing::error!(error = %err, category, "network query failed");
    AppError::fetch_failed(label)
}

pub async fn network_metrics(
    State(state): State<AppState>,
) -> Result<Json<Vec<NetworkMetricRecord>>, AppError> {
    analytics::get_network_metrics(state.source())
        .await
        .map(Json)
        .map_err(|err| failed("network-metrics", "network metrics", err))
}

pub async fn roaming(State(state): State<AppState>) -> Result<Json<RoamingData>, AppError> {
    analytics::get_roaming_data(state.source())
        .await
        .map(Json)
        .map_err(|err| failed("roaming", "roaming data", err))
}

pub async fn five_g_four_g_growth(
    State(state): State<AppState>,
) -> Result<Json<NetworkGrowth>, AppError> {
    analytics::get_5g_4g_growth(state.source())
        .await
        .map(Json)
        .map_err(|err| failed("5g-4g-growth", "growth data", err))
}

pub async fn all_growth(State(state): State<AppState>) -> Result<Json<AllGrowth>, AppError> {
    analytics::get_all_growth_data(state.source())
        .await
        .map(Json)
        .map_err(|err| failed("all-growth", "all growth data", err))
}
