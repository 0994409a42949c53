//! Gateway configuration and CLI argument parsing
//!
//! All settings come from command-line arguments with environment-variable
//! fallback (WEATHERGATE_ prefix). Precedence:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Default values (lowest priority)
//!
//! Configuration is read once at startup and never hot-reloaded; the rate
//! limiter key set and capacity are fixed for the process lifetime.
//!
//! # Example Usage
//!
//! ```bash
//! # Using CLI arguments
//! weathergate --api-key abc123 --client-key K1 --client-key K2
//!
//! # Using environment variables
//! export WEATHERGATE_API_KEYS=abc123,def456
//! export WEATHERGATE_CLIENT_KEYS=K1,K2,K3,K4,K5
//! weathergate
//! ```

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Deserialize;

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP listener configuration
    pub http: HttpConfig,
    /// Upstream weather provider configuration
    pub upstream: UpstreamConfig,
    /// Rate limiter configuration
    pub rate_limit: RateLimitConfig,
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

/// Upstream weather provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the weather API
    pub base_url: String,
    /// API keys to spread upstream traffic across
    pub api_keys: Vec<String>,
    /// Request timeout (seconds)
    pub timeout: u64,
}

/// Rate limiter configuration
///
/// One token per client key; every token shares the same capacity and
/// refill interval.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Client keys, one rate limiter token each, in consumption order
    pub client_keys: Vec<String>,
    /// Uses per token per refill interval
    pub token_capacity: u32,
    /// Refill interval (seconds)
    pub refill_interval: u64,
}

/// Command-line arguments for the gateway
///
/// All arguments can also be set via environment variables with the
/// WEATHERGATE_ prefix. CLI arguments take precedence over environment
/// variables.
#[derive(Parser, Debug)]
#[command(
    name = "weathergate",
    about = "Rate-limited gateway for the OpenWeatherMap API",
    long_about = "A rate-limited HTTP gateway for the OpenWeatherMap API.\n\nEnvironment variables with WEATHERGATE_ prefix are supported. CLI arguments take precedence over environment variables."
)]
pub struct Args {
    // HTTP listener
    #[arg(
        long,
        value_name = "HOST",
        help = "HTTP host",
        default_value = "127.0.0.1",
        env = "WEATHERGATE_HOST"
    )]
    pub host: String,
    #[arg(
        long,
        value_name = "PORT",
        help = "HTTP port",
        default_value_t = 8080,
        env = "WEATHERGATE_PORT"
    )]
    pub port: u16,

    // Upstream provider
    #[arg(
        long,
        value_name = "URL",
        help = "Upstream weather API base URL",
        default_value = "https://api.openweathermap.org/data/2.5/weather",
        env = "WEATHERGATE_UPSTREAM_URL"
    )]
    pub upstream_url: String,
    #[arg(
        long = "api-key",
        value_name = "KEY",
        help = "Upstream API key (repeatable; comma-separated in the env var)",
        env = "WEATHERGATE_API_KEYS",
        value_delimiter = ','
    )]
    pub api_keys: Vec<String>,
    #[arg(
        long,
        value_name = "SECS",
        help = "Upstream request timeout (seconds)",
        default_value_t = 10,
        env = "WEATHERGATE_UPSTREAM_TIMEOUT"
    )]
    pub upstream_timeout: u64,

    // Rate limiter
    #[arg(
        long = "client-key",
        value_name = "KEY",
        help = "Rate limiter client key (repeatable; comma-separated in the env var)",
        env = "WEATHERGATE_CLIENT_KEYS",
        value_delimiter = ','
    )]
    pub client_keys: Vec<String>,
    #[arg(
        long,
        value_name = "N",
        help = "Uses per client key per refill interval",
        default_value_t = 5,
        env = "WEATHERGATE_TOKEN_CAPACITY"
    )]
    pub token_capacity: u32,
    #[arg(
        long,
        value_name = "SECS",
        help = "Token refill interval (seconds)",
        default_value_t = 3600,
        env = "WEATHERGATE_REFILL_INTERVAL"
    )]
    pub refill_interval: u64,

    // General options
    #[arg(
        long,
        value_name = "LEVEL",
        help = "Log level: error, warn, info, debug, trace",
        default_value = "info",
        env = "WEATHERGATE_LOG_LEVEL"
    )]
    pub log_level: String,
}

impl Config {
    /// Build configuration from environment variables and CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when key lists are empty or numeric settings are
    /// not positive.
    pub fn from_env_and_args() -> Result<Self> {
        // Clap resolves the precedence: CLI > environment > default
        Self::from_args(Args::parse())
    }

    fn from_args(args: Args) -> Result<Self> {
        let config = Config {
            http: HttpConfig {
                host: args.host,
                port: args.port,
            },
            upstream: UpstreamConfig {
                base_url: args.upstream_url,
                api_keys: args.api_keys,
                timeout: args.upstream_timeout,
            },
            rate_limit: RateLimitConfig {
                client_keys: args.client_keys,
                token_capacity: args.token_capacity,
                refill_interval: args.refill_interval,
            },
            log_level: args.log_level,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// The rate limiter itself does not defend against a misconfigured key
    /// set or capacity; this is the single place those are rejected.
    fn validate(&self) -> Result<()> {
        if self.rate_limit.client_keys.is_empty()
            || self.rate_limit.client_keys.iter().any(|key| key.is_empty())
        {
            return Err(anyhow!(
                "At least one non-empty rate limiter client key must be configured.\n\n\
                Example:\n  \
                weathergate --client-key K1 --client-key K2\n  \
                WEATHERGATE_CLIENT_KEYS=K1,K2,K3,K4,K5\n\n\
                For more information, try '--help'"
            ));
        }

        if self.rate_limit.token_capacity == 0 {
            return Err(anyhow!("Token capacity must be a positive integer"));
        }

        if self.rate_limit.refill_interval == 0 {
            return Err(anyhow!("Refill interval must be a positive number of seconds"));
        }

        if self.upstream.base_url.is_empty() {
            return Err(anyhow!("Upstream base URL must not be empty"));
        }

        if self.upstream.api_keys.is_empty()
            || self.upstream.api_keys.iter().any(|key| key.is_empty())
        {
            return Err(anyhow!(
                "At least one non-empty upstream API key must be configured.\n\n\
                Example:\n  \
                weathergate --api-key abc123\n  \
                WEATHERGATE_API_KEYS=abc123,def456\n\n\
                For more information, try '--help'"
            ));
        }

        Ok(())
    }
}
