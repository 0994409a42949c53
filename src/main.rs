use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use weathergate::config::Config;
use weathergate::core::{RateLimiter, TokenBucket};
use weathergate::metrics::Metrics;
use weathergate::transport::Transport;
use weathergate::transport::http::{AppState, HttpTransport};
use weathergate::validate::LocationValidator;
use weathergate::weather::OpenWeatherClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration from environment variables and CLI arguments
    let config = Config::from_env_and_args()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("weathergate={}", config.log_level).parse()?),
        )
        .init();

    // Build the shared token-bucket rate limiter
    let bucket = TokenBucket::new(
        &config.rate_limit.client_keys,
        config.rate_limit.token_capacity,
    );
    let limiter = Arc::new(RateLimiter::new(
        bucket,
        Duration::from_secs(config.rate_limit.refill_interval),
    ));

    tracing::info!(
        client_keys = config.rate_limit.client_keys.len(),
        token_capacity = config.rate_limit.token_capacity,
        refill_interval_secs = config.rate_limit.refill_interval,
        "rate limiter initialized"
    );

    // Upstream provider client
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream.timeout))
        .build()?;
    let provider = Arc::new(OpenWeatherClient::new(
        http_client,
        config.upstream.base_url.clone(),
        config.upstream.api_keys.clone(),
    ));

    tracing::info!(
        upstream = %config.upstream.base_url,
        api_keys = config.upstream.api_keys.len(),
        "upstream provider configured"
    );

    let state = Arc::new(AppState {
        limiter,
        provider,
        validator: LocationValidator::new(),
        metrics: Arc::new(Metrics::new()),
    });

    let transport = HttpTransport::new(&config.http.host, config.http.port)?;
    transport.start(state).await
}
