//! End-to-end tests for the gateway over real TCP.
//!
//! Each test runs the full router against a canned upstream server bound
//! to an ephemeral port, so validation, rate limiting, forwarding, and
//! error mapping are exercised exactly as in production.

use axum::{Json, Router, routing::get};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

use weathergate::core::{RateLimiter, TokenBucket};
use weathergate::metrics::Metrics;
use weathergate::transport::http::{AppState, router};
use weathergate::validate::LocationValidator;
use weathergate::weather::OpenWeatherClient;

/// Serve a canned OpenWeatherMap-shaped payload on an ephemeral port and
/// return the base URL.
async fn spawn_upstream() -> String {
    let app = Router::new().route(
        "/",
        get(|| async {
            Json(serde_json::json!({
                "coord": {"lon": -0.13, "lat": 51.51},
                "weather": [
                    {"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}
                ],
                "main": {"temp": 293.55},
                "name": "London"
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/")
}

/// Serve the gateway router on an ephemeral port and return the base URL.
async fn spawn_gateway(upstream_url: &str, client_keys: &[&str], capacity: u32) -> String {
    let keys: Vec<String> = client_keys.iter().map(|k| k.to_string()).collect();
    let limiter = Arc::new(RateLimiter::new(
        TokenBucket::new(&keys, capacity),
        Duration::from_secs(3600),
    ));
    let provider = Arc::new(OpenWeatherClient::new(
        reqwest::Client::new(),
        upstream_url,
        vec!["test-api-key".to_string()],
    ));
    let state = Arc::new(AppState {
        limiter,
        provider,
        validator: LocationValidator::new(),
        metrics: Arc::new(Metrics::new()),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_returns_description_for_valid_location() {
    let upstream = spawn_upstream().await;
    let gateway = spawn_gateway(&upstream, &["K1"], 5).await;

    let response = reqwest::get(format!("{gateway}/weather?city=London&country=England"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["description"], "clear sky");
}

#[tokio::test]
async fn test_rejects_invalid_location_without_spending_quota() {
    let upstream = spawn_upstream().await;
    let gateway = spawn_gateway(&upstream, &["K1"], 1).await;

    let response = reqwest::get(format!("{gateway}/weather?city=London1&country=England"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "City must contain only letters and spaces.");

    // The invalid request must not have consumed the single token
    let response = reqwest::get(format!("{gateway}/weather?city=London&country=England"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_params_are_a_validation_error() {
    let upstream = spawn_upstream().await;
    let gateway = spawn_gateway(&upstream, &["K1"], 5).await;

    let response = reqwest::get(format!("{gateway}/weather?city=London"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "City and country must be provided.");
}

#[tokio::test]
async fn test_throttles_after_quota_is_exhausted() {
    let upstream = spawn_upstream().await;
    let gateway = spawn_gateway(&upstream, &["K1", "K2"], 1).await;

    for _ in 0..2 {
        let response = reqwest::get(format!("{gateway}/weather?city=London&country=England"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = reqwest::get(format!("{gateway}/weather?city=London&country=England"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Rate limit exceeded. Try again later.");
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    // Bind a port, then drop it so connections are refused
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_upstream = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let gateway = spawn_gateway(&dead_upstream, &["K1"], 5).await;

    let response = reqwest::get(format!("{gateway}/weather?city=London&country=England"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No weather data available for London, England.");
}

#[tokio::test]
async fn test_health_endpoint() {
    let upstream = spawn_upstream().await;
    let gateway = spawn_gateway(&upstream, &["K1"], 5).await;

    let response = reqwest::get(format!("{gateway}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_metrics_track_traffic_and_tokens() {
    let upstream = spawn_upstream().await;
    let gateway = spawn_gateway(&upstream, &["K1"], 2).await;

    // One allowed, one invalid, then exhaustion
    for _ in 0..3 {
        reqwest::get(format!("{gateway}/weather?city=London&country=England"))
            .await
            .unwrap();
    }
    reqwest::get(format!("{gateway}/weather?city=London1&country=England"))
        .await
        .unwrap();

    let body = reqwest::get(format!("{gateway}/metrics"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("weathergate_requests_total 4"));
    assert!(body.contains("weathergate_requests_allowed 2"));
    assert!(body.contains("weathergate_requests_throttled 1"));
    assert!(body.contains("weathergate_validation_failures 1"));
    assert!(body.contains("weathergate_tokens_remaining{key=\"K1\"} 0"));
}
