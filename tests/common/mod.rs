#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use traffic_insights::config::AnalyticsOptions;
use traffic_insights::state::{AppState, DataSource};

pub async fn create_test_app() -> Router {
    std::env::set_var("NODE_ENV", "test");
    std::env::set_var("DATABASE_URL", "");

    traffic_insights::create_app().await
}

pub fn mock_app() -> Router {
    traffic_insights::build_app(AppState::mock(AnalyticsOptions::default()))
}

pub fn unavailable_app(options: AnalyticsOptions) -> Router {
    traffic_insights::build_app(AppState::new(DataSource::Unavailable, options))
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}
