//! Integration tests for metric ingestion and queries.
//!
//! Covers recording, threshold alerting through the ingestion path, the
//! unknown-metric ignore behaviour, and time-range scoping.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get, post_json};
use serde_json::json;

#[tokio::test]
async fn record_and_query_round_trip() {
    let app = common::build_test_app();

    let response = post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "cpu", "value": 42.5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, "/api/v1/metrics?category=system").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let cpu = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["metric"] == "cpu")
        .expect("cpu series should be present");
    assert_eq!(cpu["current"], 42.5);
    assert_eq!(cpu["threshold"], 80.0);
    assert_eq!(cpu["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn query_without_category_returns_whole_catalogue() {
    let app = common::build_test_app();

    let response = get(&app, "/api/v1/metrics").await;
    let json = body_json(response).await;

    let series = json["data"].as_array().unwrap();
    // Never-recorded series are still listed, with zero current values.
    assert!(series.len() > 10);
    assert!(series.iter().all(|s| s["current"] == 0.0));
}

#[tokio::test]
async fn warning_alert_raised_between_threshold_and_critical_bound() {
    let app = common::build_test_app();

    // cpu threshold is 80; 85 <= 120 so this is a warning.
    post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "cpu", "value": 85.0 }),
    )
    .await;

    let json = body_json(get(&app, "/api/v1/alerts?status=active").await).await;
    let alerts = json["data"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["severity"], "warning");
    assert_eq!(alerts[0]["kind"], "threshold");
    assert_eq!(alerts[0]["value"], 85.0);
    assert_eq!(alerts[0]["threshold"], 80.0);
}

#[tokio::test]
async fn critical_alert_raised_above_critical_bound() {
    let app = common::build_test_app();

    // 130 > 80 * 1.5
    post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "cpu", "value": 130.0 }),
    )
    .await;

    let json = body_json(get(&app, "/api/v1/alerts").await).await;
    let alerts = json["data"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["severity"], "critical");
}

#[tokio::test]
async fn in_range_value_raises_no_alert() {
    let app = common::build_test_app();

    post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "cpu", "value": 79.9 }),
    )
    .await;

    let json = body_json(get(&app, "/api/v1/alerts?status=all").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_metric_is_ignored_not_failed() {
    let app = common::build_test_app();

    let response = post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "not_in_catalogue", "value": 1.0 }),
    )
    .await;

    // Producers never fail ingestion; the observation is dropped.
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(&app, "/api/v1/metrics?category=system").await).await;
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["metric"] != "not_in_catalogue"));
}

#[tokio::test]
async fn invalid_category_is_rejected_by_deserialization() {
    let app = common::build_test_app();

    let response = post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "kitchen", "metric": "cpu", "value": 1.0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn explicit_timestamps_respect_the_query_window() {
    let app = common::build_test_app();

    let stale = (Utc::now() - Duration::hours(3)).to_rfc3339();
    post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "memory", "value": 30.0, "timestamp": stale }),
    )
    .await;
    post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "memory", "value": 40.0 }),
    )
    .await;

    // Default window is one hour: only the fresh point is visible.
    let json = body_json(get(&app, "/api/v1/metrics?category=system").await).await;
    let memory = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["metric"] == "memory")
        .unwrap();
    assert_eq!(memory["history"].as_array().unwrap().len(), 1);

    // A wider window sees both.
    let json = body_json(get(&app, "/api/v1/metrics?category=system&range=1d").await).await;
    let memory = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["metric"] == "memory")
        .unwrap();
    assert_eq!(memory["history"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn future_timestamps_fall_outside_the_query_window() {
    let app = common::build_test_app();

    let ahead = (Utc::now() + Duration::hours(5)).to_rfc3339();
    post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "memory", "value": 30.0, "timestamp": ahead }),
    )
    .await;
    post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "memory", "value": 40.0 }),
    )
    .await;

    // The window ends at the server clock, so the forward-dated point is
    // excluded no matter how wide the range is.
    let json = body_json(get(&app, "/api/v1/metrics?category=system&range=1w").await).await;
    let memory = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["metric"] == "memory")
        .unwrap();
    assert_eq!(memory["history"].as_array().unwrap().len(), 1);
    assert_eq!(memory["history"][0]["value"], 40.0);
}

#[tokio::test]
async fn malformed_range_degrades_to_one_hour() {
    let app = common::build_test_app();

    let stale = (Utc::now() - Duration::hours(3)).to_rfc3339();
    post_json(
        &app,
        "/api/v1/metrics",
        json!({ "category": "system", "metric": "disk", "value": 10.0, "timestamp": stale }),
    )
    .await;

    let json = body_json(get(&app, "/api/v1/metrics?category=system&range=banana").await).await;
    let disk = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["metric"] == "disk")
        .unwrap();
    // 3-hour-old point falls outside the defaulted 1-hour window.
    assert!(disk["history"].as_array().unwrap().is_empty());
}
