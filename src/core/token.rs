//! Quota slots and the fixed-order pool that holds them

use std::time::{Duration, SystemTime};

/// A single quota slot bound to one client key.
///
/// A token starts full and is debited one unit per consumed request. Once
/// the refill interval has elapsed since its last reset it snaps back to
/// full capacity. The key is an opaque identifier kept for diagnostics; it
/// has no influence on selection order.
#[derive(Debug, Clone)]
pub struct Token {
    key: String,
    capacity: u32,
    remaining: u32,
    last_refill: SystemTime,
}

impl Token {
    /// Create a full token for `key`, stamped with `now` as its creation
    /// (and first refill) time.
    pub fn new(key: impl Into<String>, capacity: u32, now: SystemTime) -> Self {
        Token {
            key: key.into(),
            capacity,
            remaining: capacity,
            last_refill: now,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn last_refill(&self) -> SystemTime {
        self.last_refill
    }

    /// Reset to full capacity if `interval` has elapsed since the last
    /// refill; otherwise do nothing.
    ///
    /// Repeated calls within the same interval window are no-ops. A clock
    /// that moved backwards counts as "interval not elapsed", so
    /// `last_refill` never goes backwards.
    pub fn refill(&mut self, now: SystemTime, interval: Duration) {
        let elapsed = now
            .duration_since(self.last_refill)
            .unwrap_or(Duration::ZERO);
        if elapsed >= interval {
            self.remaining = self.capacity;
            self.last_refill = now;
        }
    }

    /// Consume one unit of this token's quota.
    ///
    /// Returns `false` without any side effect when the token is exhausted.
    pub fn try_debit(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }
}

/// The fixed, ordered set of tokens configured at startup.
///
/// One token per configured key, in configuration order. The pool never
/// grows or shrinks after construction. Duplicate keys are kept as
/// separate tokens with independent balances, so total pool capacity is
/// always `keys.len() * capacity`.
#[derive(Debug)]
pub struct TokenBucket {
    tokens: Vec<Token>,
}

impl TokenBucket {
    /// Build one full token per key, all sharing the same `capacity`.
    pub fn new(keys: &[String], capacity: u32) -> Self {
        let now = SystemTime::now();
        let tokens = keys
            .iter()
            .map(|key| Token::new(key.clone(), capacity, now))
            .collect();
        TokenBucket { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
