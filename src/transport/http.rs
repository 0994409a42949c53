//! HTTP/JSON transport for the weather gateway
//!
//! # API Endpoints
//!
//! ## GET /weather?city=<city>&country=<country>
//!
//! Runs the full gateway pipeline: validate the location, consume one unit
//! of rate limiter quota, fetch the upstream description.
//!
//! ### Responses
//!
//! ```json
//! {"description": "clear sky"}
//! ```
//!
//! - `400`: invalid city/country, `{"error": "City must contain only letters and spaces."}`
//! - `429`: quota exhausted, `{"error": "Rate limit exceeded. Try again later."}`
//! - `404`: upstream replied without a description
//! - `502`: upstream unreachable or non-2xx
//! - `500`: upstream client misconfigured
//!
//! Missing query parameters deserialize to empty strings and are rejected
//! by validation with the same message as blank input.
//!
//! ## GET /health
//!
//! Health check endpoint. Returns "OK" with 200 status.
//!
//! ## GET /metrics
//!
//! Prometheus text format, including per-token remaining-quota gauges.

use super::Transport;
use crate::core::RateLimiter;
use crate::metrics::Metrics;
use crate::validate::LocationValidator;
use crate::weather::{WeatherError, WeatherProvider};
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Query parameters for the weather endpoint.
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Successful weather lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherBody {
    /// Upstream weather description, e.g. "clear sky"
    pub description: String,
}

/// Error response format.
#[derive(Debug, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error message
    pub error: String,
}

/// Shared state for all request handlers.
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub provider: Arc<dyn WeatherProvider>,
    pub validator: LocationValidator,
    pub metrics: Arc<Metrics>,
}

/// HTTP transport implementation.
pub struct HttpTransport {
    addr: SocketAddr,
}

impl HttpTransport {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}").parse()?;
        Ok(Self { addr })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn start(self, state: Arc<AppState>) -> Result<()> {
        let app = router(state);

        tracing::info!("HTTP server listening on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the gateway router. Exposed so integration tests can serve it on
/// an ephemeral port.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/weather", get(handle_weather))
        .route("/health", get(|| async { "OK" }))
        .route("/metrics", get(handle_metrics))
        .with_state(state)
}

async fn handle_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherBody>, (StatusCode, Json<HttpErrorResponse>)> {
    let start = Instant::now();
    tracing::info!(city = %query.city, country = %query.country, "weather request received");

    if let Err(err) = state.validator.validate(&query.city, &query.country) {
        state.metrics.record_validation_failure(elapsed_micros(start));
        return Err(error_response(StatusCode::BAD_REQUEST, err.to_string()));
    }

    if !state.limiter.try_consume_token() {
        state.metrics.record_request(elapsed_micros(start), false);
        return Err(error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Try again later.".to_string(),
        ));
    }

    let result = state
        .provider
        .fetch_description(&query.city, &query.country)
        .await;
    let latency_us = elapsed_micros(start);

    match result {
        Ok(description) => {
            state.metrics.record_request(latency_us, true);
            Ok(Json(WeatherBody { description }))
        }
        Err(err) => {
            state.metrics.record_upstream_error(latency_us);
            tracing::error!(
                city = %query.city,
                country = %query.country,
                error = %err,
                "weather lookup failed"
            );
            Err(weather_error_response(&err, &query))
        }
    }
}

async fn handle_metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.export_prometheus(&state.limiter.snapshot())
}

fn weather_error_response(
    err: &WeatherError,
    query: &WeatherQuery,
) -> (StatusCode, Json<HttpErrorResponse>) {
    match err {
        WeatherError::Upstream(_) => error_response(
            StatusCode::BAD_GATEWAY,
            format!(
                "No weather data available for {}, {}.",
                query.city, query.country
            ),
        ),
        WeatherError::MissingDescription => {
            error_response(StatusCode::NOT_FOUND, err.to_string())
        }
        WeatherError::MissingBaseUrl | WeatherError::NoApiKeys => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn error_response(status: StatusCode, error: String) -> (StatusCode, Json<HttpErrorResponse>) {
    (status, Json(HttpErrorResponse { error }))
}

fn elapsed_micros(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}
