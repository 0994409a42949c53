//! # Weathergate
//!
//! A rate-limited HTTP gateway for the OpenWeatherMap API.
//!
//! ## Purpose
//!
//! Weathergate answers "what is the weather in city X, country Y" while
//! protecting a pool of upstream credentials from overuse. Every inbound
//! request is validated, charged against a shared token-bucket quota, and
//! only then forwarded upstream; the provider's response is normalized to
//! a plain weather description or a structured error.
//!
//! ## Request flow
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌─────────────┐   ┌──────────────┐
//! │  Client  │──▶│ Validate  │──▶│ RateLimiter │──▶│   Upstream   │
//! │          │   │ (letters  │   │ (first-fit  │   │ (OpenWeather │
//! │          │   │ + spaces) │   │ token pool) │   │     Map)     │
//! └──────────┘   └───────────┘   └─────────────┘   └──────────────┘
//!      400 on invalid input │ 429 on empty pool │ 502/404 on failure
//! ```
//!
//! ## Rate limiting
//!
//! The quota is a fixed, ordered pool of tokens, one per configured client
//! key. Each token carries `token_capacity` uses and refills to full
//! capacity once `refill_interval` (default one hour) has elapsed since
//! its last reset. A request consumes one unit from the first token with
//! remaining capacity; when a full scan finds none, the gateway answers
//! `429` without touching the upstream.
//!
//! The whole scan runs under a single lock, so the pool can never be
//! oversold by concurrent requests. See [`core`] for the limiter itself.
//!
//! ## Quick Start
//!
//! ```bash
//! # Minimal: one upstream key, one client key
//! weathergate --api-key <openweathermap-key> --client-key K1
//!
//! # Reference policy: 5 client keys x 5 uses per hour
//! export WEATHERGATE_API_KEYS=abc123,def456
//! export WEATHERGATE_CLIENT_KEYS=K1,K2,K3,K4,K5
//! weathergate --port 8080
//!
//! curl 'http://localhost:8080/weather?city=London&country=England'
//! ```
//!
//! ## Configuration
//!
//! Configure via CLI arguments or environment variables (CLI takes
//! precedence). See [`config`] for the full list; the essentials:
//!
//! - `--api-key` / `WEATHERGATE_API_KEYS`: upstream credentials, one
//!   chosen at random per forwarded request
//! - `--client-key` / `WEATHERGATE_CLIENT_KEYS`: rate limiter tokens, in
//!   consumption order
//! - `--token-capacity`: uses per token per interval (default 5)
//! - `--refill-interval`: seconds between token refills (default 3600)

pub mod config;
pub mod core;
pub mod metrics;
pub mod transport;
pub mod validate;
pub mod weather;
