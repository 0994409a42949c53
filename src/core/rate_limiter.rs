//! First-fit token-bucket rate limiter
//!
//! This module provides the [`RateLimiter`] struct which coordinates
//! refills and debits across the token pool under a single lock.

use super::token::TokenBucket;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Point-in-time view of one token, for diagnostics and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    /// The client key this token is bound to
    pub key: String,
    /// Units left in the current window
    pub remaining: u32,
    /// Fixed capacity the token refills to
    pub capacity: u32,
}

/// Shared token-bucket rate limiter.
///
/// Owns its [`TokenBucket`] exclusively behind one lock: the whole
/// refill-scan-debit pass of a call is a single critical section, so two
/// concurrent callers can never both observe the same last unit and
/// oversell it. Lock hold time is O(pool size) with no I/O inside.
///
/// Tokens are scanned in configured order and the first one with remaining
/// capacity wins. The same token is preferred on every call until it is
/// exhausted; selection is deterministic, not fair.
///
/// # Example
///
/// ```
/// use weathergate::core::{RateLimiter, TokenBucket};
///
/// let keys = vec!["K1".to_string(), "K2".to_string()];
/// let limiter = RateLimiter::new(TokenBucket::new(&keys, 5), RateLimiter::DEFAULT_REFILL_INTERVAL);
///
/// assert!(limiter.try_consume_token());
/// ```
pub struct RateLimiter {
    bucket: Mutex<TokenBucket>,
    refill_interval: Duration,
}

impl RateLimiter {
    /// Reference refill policy: an exhausted token resets to full capacity
    /// one hour after its last refill.
    pub const DEFAULT_REFILL_INTERVAL: Duration = Duration::from_secs(3600);

    /// Create a limiter over `bucket` with a fixed refill interval shared
    /// by all tokens.
    pub fn new(bucket: TokenBucket, refill_interval: Duration) -> Self {
        RateLimiter {
            bucket: Mutex::new(bucket),
            refill_interval,
        }
    }

    /// Try to consume one unit of quota at the current wall-clock time.
    ///
    /// Returns `true` if a token was debited, `false` if every token is
    /// exhausted right now. Callable concurrently without external
    /// synchronization.
    pub fn try_consume_token(&self) -> bool {
        self.try_consume_token_at(SystemTime::now())
    }

    /// Try to consume one unit of quota as of `now`.
    ///
    /// The time is captured once per call so a refill boundary cannot race
    /// within a single invocation. For each token in configured order the
    /// limiter refills it (a no-op unless its interval elapsed) and then
    /// attempts the debit; the first success ends the scan. A full pass
    /// with no success is the normal "rate limited" result, not an error.
    /// An empty pool always returns `false`.
    pub fn try_consume_token_at(&self, now: SystemTime) -> bool {
        let mut bucket = self.bucket.lock().expect("token bucket lock poisoned");
        for token in bucket.tokens_mut() {
            token.refill(now, self.refill_interval);
            if token.try_debit() {
                tracing::debug!(
                    key = token.key(),
                    remaining = token.remaining(),
                    "token consumed"
                );
                return true;
            }
        }
        tracing::warn!("rate limit exceeded, no tokens available");
        false
    }

    /// The fixed interval after which an exhausted token refills.
    pub fn refill_interval(&self) -> Duration {
        self.refill_interval
    }

    /// Per-token balances in configured order, taken under the same lock
    /// as [`try_consume_token`](Self::try_consume_token).
    pub fn snapshot(&self) -> Vec<TokenState> {
        let bucket = self.bucket.lock().expect("token bucket lock poisoned");
        bucket
            .tokens()
            .iter()
            .map(|token| TokenState {
                key: token.key().to_string(),
                remaining: token.remaining(),
                capacity: token.capacity(),
            })
            .collect()
    }
}
