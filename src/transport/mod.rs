//! Transport layer for the weather gateway
//!
//! The gateway speaks one protocol, HTTP/JSON, implemented in [`http`].
//! The [`Transport`] trait is the seam between startup wiring and the
//! listening surface: a transport binds, serves, and runs until the
//! process exits.

pub mod http;

#[cfg(test)]
mod http_test;

use crate::transport::http::AppState;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for gateway transports.
///
/// A transport is responsible for:
/// - binding to its configured address
/// - parsing protocol-specific requests
/// - running the validate → rate-limit → fetch pipeline over shared state
/// - shaping responses and errors back to clients
#[async_trait]
pub trait Transport {
    /// Bind and serve requests until an error occurs or the server shuts
    /// down.
    async fn start(self, state: Arc<AppState>) -> Result<()>;
}
