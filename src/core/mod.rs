//! Multi-key token-bucket rate limiter
//!
//! This module bounds the gateway's outbound request volume. The quota is
//! split across several independent [`Token`]s, one per configured client
//! key, held in a fixed-order [`TokenBucket`]. The [`RateLimiter`] refills
//! tokens on a fixed schedule and debits the first token with remaining
//! capacity, all under a single lock.
//!
//! The module is synchronous and performs no I/O: a call either consumes a
//! unit of quota and returns `true`, or returns `false` when every token is
//! exhausted. "Rate limited" is a normal result here, never an error.

pub mod rate_limiter;
pub mod token;


pub use rate_limiter::{RateLimiter, TokenState};
pub use token::{Token, TokenBucket};
