use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::state::{AppState, DataSource};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    data_source: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_latency_ms: Option<u64>,
    timestamp: String,
    uptime: u64,
}

enum DbCheckStatus {
    NotConfigured,
    Connected { latency_ms: u64 },
    Timeout,
    Disconnected,
}

pub async fn ping() -> &'static str {
    "pong"
}

pub async fn health(State(state): State<AppState>) -> Response {
    let check = database_check(state.source()).await;

    let (database, latency_ms) = match check {
        DbCheckStatus::NotConfigured => ("not_configured", None),
        DbCheckStatus::Connected { latency_ms } => ("connected", Some(latency_ms)),
        DbCheckStatus::Timeout => ("timeout", None),
        DbCheckStatus::Disconnected => ("disconnected", None),
    };
    let ok = matches!(
        check,
        DbCheckStatus::NotConfigured | DbCheckStatus::Connected { .. }
    );

    let response = HealthResponse {
        status: if ok { "ok" } else { "degraded" },
        data_source: state.source().label(),
        database,
        database_latency_ms: latency_ms,
        timestamp: now_iso(),
        uptime: state.uptime_seconds(),
    };

    let status_code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

async fn database_check(source: &DataSource) -> DbCheckStatus {
    let proxy = match source {
        DataSource::Mock(_) => return DbCheckStatus::NotConfigured,
        DataSource::Unavailable => return DbCheckStatus::Disconnected,
        DataSource::Postgres(proxy) => proxy,
    };

    match proxy.ping().await {
        Ok(elapsed) => DbCheckStatus::Connected {
            latency_ms: elapsed.as_millis() as u64,
        },
        Err(crate::db::DbPingError::Timeout) => DbCheckStatus::Timeout,
        Err(err) => {
            tracing::warn!(error = %err, "database health check failed");
            DbCheckStatus::Disconnected
        }
    }
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
