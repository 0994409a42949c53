//! Upstream weather provider client
//!
//! Fetches current conditions from an OpenWeatherMap-compatible endpoint
//! and reduces the response to its weather description. Each request picks
//! one of the configured API keys uniformly at random; key choice here is
//! independent of the rate limiter's client-key ordering.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by the provider client.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Configuration error: Base URL for the weather API is missing.")]
    MissingBaseUrl,

    #[error("Configuration error: No valid API keys available for the weather API.")]
    NoApiKeys,

    #[error("Weather description not available from the API.")]
    MissingDescription,

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Seam between the HTTP surface and the upstream provider.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch the current weather description for a validated location.
    async fn fetch_description(&self, city: &str, country: &str) -> Result<String, WeatherError>;
}

/// OpenWeatherMap-backed [`WeatherProvider`].
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_keys: Vec<String>,
}

/// The slice of the upstream payload the gateway cares about.
#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    weather: Vec<WeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    description: Option<String>,
}

impl OpenWeatherClient {
    /// Create a client over a shared `reqwest::Client`.
    ///
    /// Timeouts belong to the `reqwest::Client` passed in; configuration
    /// problems (empty base URL, no usable keys) are reported per request,
    /// matching the gateway's error contract.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_keys: Vec<String>) -> Self {
        OpenWeatherClient {
            http,
            base_url: base_url.into(),
            api_keys,
        }
    }

    fn pick_key(&self) -> Option<&str> {
        if self.api_keys.is_empty() || self.api_keys.iter().any(|key| key.is_empty()) {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..self.api_keys.len());
        Some(&self.api_keys[idx])
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch_description(&self, city: &str, country: &str) -> Result<String, WeatherError> {
        if self.base_url.is_empty() {
            tracing::error!("upstream base URL is not configured");
            return Err(WeatherError::MissingBaseUrl);
        }
        let Some(key) = self.pick_key() else {
            tracing::error!("no usable upstream API keys configured");
            return Err(WeatherError::NoApiKeys);
        };

        tracing::debug!(city, country, "fetching weather from upstream");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", format!("{city},{country}")), ("appid", key.to_string())])
            .send()
            .await?
            .error_for_status()?;

        let payload: UpstreamResponse = response.json().await?;
        let description = payload
            .weather
            .into_iter()
            .next()
            .and_then(|entry| entry.description)
            .filter(|description| !description.is_empty())
            .ok_or(WeatherError::MissingDescription)?;

        tracing::info!(city, country, %description, "weather description retrieved");
        Ok(description)
    }
}
