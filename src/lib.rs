pub mod config;
pub mod db;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod storage;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AnalyticsOptions;
use crate::db::config::DbConfig;
use crate::db::DatabaseProxy;
use crate::state::{AppState, DataSource};
use crate::storage::MemStorage;

/// Chooses the data source from the environment. Without `DATABASE_URL` the
/// seeded mock store is used; a configured database that cannot be reached
/// leaves every query failing with `DatabaseNotConnected`.
pub async fn resolve_data_source() -> DataSource {
    let Some(db_config) = DbConfig::from_env() else {
        tracing::info!("DATABASE_URL not set, serving seeded mock data");
        return DataSource::Mock(Arc::new(MemStorage::seeded()));
    };

    match DatabaseProxy::connect(db_config).await {
        Ok(proxy) => DataSource::Postgres(proxy),
        Err(err) => {
            tracing::warn!(error = %err, "database proxy not initialized");
            DataSource::Unavailable
        }
    }
}

pub fn build_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn create_app() -> axum::Router {
    let source = resolve_data_source().await;
    let state = AppState::new(source, AnalyticsOptions::from_env());
    build_app(state)
}
