use axum::http::StatusCode;
use serde_json::Value;

use traffic_insights::config::AnalyticsOptions;

mod common;

fn assert_growth_sorted(rows: &[Value]) {
    let growth: Vec<Option<f64>> = rows
        .iter()
        .map(|r| r["growthPercentage"].as_f64())
        .collect();
    let first_null = growth.iter().position(Option::is_none).unwrap_or(growth.len());
    assert!(growth[first_null..].iter().all(Option::is_none));
    for pair in growth[..first_null].windows(2) {
        assert!(pair[0].unwrap() >= pair[1].unwrap());
    }
}

#[tokio::test]
async fn test_ping() {
    let (status, body) = common::get(common::mock_app(), "/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong");
}

#[tokio::test]
async fn test_health_reports_mock_source() {
    let (status, body) = common::get_json(common::mock_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["dataSource"], "mock");
    assert!(body["timestamp"].is_string());
    assert!(body["uptime"].is_u64());
}

#[tokio::test]
async fn test_create_app_without_database_url_uses_mock() {
    let app = common::create_test_app().await;
    let (status, body) = common::get_json(app, "/api/traffic").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_traffic_records() {
    let (status, body) = common::get_json(common::mock_app(), "/api/traffic").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    let months: Vec<u64> = rows.iter().map(|r| r["month"].as_u64().unwrap()).collect();
    assert_eq!(months, vec![5, 6, 7]);
    assert!(rows[0]["deltaPercentage"].is_null());
    assert!(rows[1]["deltaPercentage"].as_f64().unwrap() < 0.0);
    assert!(rows[2]["deltaPercentage"].as_f64().unwrap() > 0.0);
    assert!(rows[2]["normalizedTraffic"].is_number());
    assert!(rows[2]["totalDlVol"].is_number());
}

#[tokio::test]
async fn test_summary_growth_rate() {
    let (status, body) = common::get_json(common::mock_app(), "/api/analytics/summary").await;
    assert_eq!(status, StatusCode::OK);

    let growth_rate = body["growthRate"].as_f64().unwrap();
    assert!((growth_rate - 6.35).abs() < 0.01, "growthRate = {growth_rate}");
    assert!(body["totalTrafficJuly"].as_f64().unwrap() > 2.5e8);
    assert!(body["normalizedTrafficJuly"].as_f64().unwrap() > 8.0e6);
    assert!(body["totalGrowthRate"].is_number());

    let apps = body["topApplications"].as_array().unwrap();
    assert_eq!(apps.len(), 3);
    assert_eq!(apps[0]["application"], "YouTube");
    assert!(apps.iter().all(|a| a["month"] == 7));
    assert_eq!(apps[0]["rank"], 1);

    let devices = body["topDevices"].as_array().unwrap();
    assert_eq!(devices.len(), 3);
    assert_eq!(devices[0]["device"], "Apple iPhone 15 (A3089)");
    assert!(devices.iter().all(|d| d["month"] == 7));

    let five_g = body["fiveGMetrics"].as_array().unwrap();
    assert_eq!(five_g.len(), 1);
    assert_eq!(five_g[0]["factor"], "total_5g_data_daily");
    assert_eq!(five_g[0]["month"], 7);
}

#[tokio::test]
async fn test_applications_filtered_and_ranked() {
    let (status, body) = common::get_json(common::mock_app(), "/api/applications").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert!(rows.len() <= 5);
    assert!(rows
        .iter()
        .all(|r| r["application"] != "HTTPS" && r["application"] != "Quic Obfuscated"));
    assert!(rows[0]["dataJune"].is_number());
    assert!(rows[0]["dataJuly"].is_number());
    assert_growth_sorted(rows);
}

#[tokio::test]
async fn test_devices_top_five() {
    let (status, body) = common::get_json(common::mock_app(), "/api/devices").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows[0]["dataMay"].is_number());
    assert!(rows[0]["dataJune"].is_number());
    assert_growth_sorted(rows);
}

#[tokio::test]
async fn test_network_metrics() {
    let (status, body) = common::get_json(common::mock_app(), "/api/network-metrics").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 27);
    assert!(rows.iter().any(|r| r["factor"] == "total_5g_data_daily"));
    assert!(rows.iter().any(|r| r["factor"] == "Working Day"));
}

#[tokio::test]
async fn test_roaming_series() {
    let (status, body) = common::get_json(common::mock_app(), "/api/roaming").await;
    assert_eq!(status, StatusCode::OK);

    for key in ["irRoaming", "kddiRoaming", "fiveGData", "fourGData"] {
        let series = body[key].as_array().unwrap();
        assert_eq!(series.len(), 3, "{key}");
        assert!(series.iter().all(|p| p["value"].as_f64().unwrap() > 0.0));
    }
    assert_eq!(body["fiveGData"][0]["month"], "May");
    assert_eq!(body["irRoaming"][0]["factor"], "IR_Roaming");
}

#[tokio::test]
async fn test_5g_4g_growth() {
    let (status, body) = common::get_json(common::mock_app(), "/api/5g-4g-growth").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fiveG"]["factor"], "total_5g_data_daily");
    assert_eq!(body["fourG"]["factor"], "total_4g_data_daily");
    assert!(body["fiveG"]["juneData"].is_number());
    assert!(body["fiveG"]["julyData"].is_number());
    assert!(body["fiveG"]["growthPercentage"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_all_growth() {
    let (status, body) = common::get_json(common::mock_app(), "/api/all-growth").await;
    assert_eq!(status, StatusCode::OK);
    for key in ["fiveG", "fourG", "irRoaming", "kddiRoaming"] {
        assert!(body[key].is_object(), "{key}");
    }
    assert_eq!(body["kddiRoaming"]["factor"], "KDDI_Roaming");
}

#[tokio::test]
async fn test_prefectures() {
    let (status, body) = common::get_json(common::mock_app(), "/api/prefectures").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["prefecture"], "Tokyo");
    let volumes: Vec<f64> = rows.iter().map(|r| r["dataVolume"].as_f64().unwrap()).collect();
    assert!(volumes.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_cell_types() {
    let (status, body) = common::get_json(common::mock_app(), "/api/cell-types").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r["type"].is_string()));
    assert_growth_sorted(rows);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = common::get_json(common::mock_app(), "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");
}

#[tokio::test]
async fn test_unavailable_database_maps_to_generic_error() {
    let cases = [
        ("/api/traffic", "Failed to fetch traffic data"),
        ("/api/applications", "Failed to fetch application data"),
        ("/api/devices", "Failed to fetch device data"),
        ("/api/network-metrics", "Failed to fetch network metrics"),
        ("/api/analytics/summary", "Failed to fetch analytics summary"),
        ("/api/cell-types", "Failed to fetch cell type data"),
    ];
    for (uri, message) in cases {
        let app = common::unavailable_app(AnalyticsOptions::default());
        let (status, body) = common::get_json(app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn test_unavailable_database_health_is_degraded() {
    let app = common::unavailable_app(AnalyticsOptions::default());
    let (status, body) = common::get_json(app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_prefecture_fallback_when_enabled() {
    let app = common::unavailable_app(AnalyticsOptions::default());
    let (status, body) = common::get_json(app, "/api/prefectures").await;
    assert_eq!(status, StatusCode::OK);

    let total: f64 = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["dataVolume"].as_f64().unwrap())
        .sum();
    assert!((total - 100.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_prefecture_fallback_disabled() {
    let options = AnalyticsOptions {
        prefecture_fallback: false,
        ..AnalyticsOptions::default()
    };
    let (status, body) = common::get_json(common::unavailable_app(options), "/api/prefectures").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to fetch prefecture data");
}
