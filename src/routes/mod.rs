mod health;
mod network;
mod rankings;
mod regional;
mod traffic;

use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::middleware::request_log_middleware;
use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/traffic", get(traffic::traffic))
        .route("/api/analytics/summary", get(traffic::summary))
        .route("/api/applications", get(rankings::applications))
        .route("/api/devices", get(rankings::devices))
        .route("/api/network-metrics", get(network::network_metrics))
        .route("/api/roaming", get(network::roaming))
        .route("/api/5g-4g-growth", get(network::five_g_four_g_growth))
        .route("/api/all-growth", get(network::all_growth))
        .route("/api/prefectures", get(regional::prefectures))
        .route("/api/cell-types", get(regional::cell_types))
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        .fallback(fallback_handler)
        .layer(middleware::from_fn(request_log_middleware))
        .with_state(state)
}

async fn fallback_handler() -> Response {
    AppError::not_found("Not found").into_response()
}
