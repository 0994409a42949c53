//! Simple metrics collection for observability
//!
//! Lightweight atomic counters with zero allocations on the hot path,
//! rendered on demand in Prometheus text format.

use crate::core::TokenState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Core metrics collected by the gateway.
pub struct Metrics {
    /// Server start time
    start_time: Instant,

    /// Total requests received on the weather endpoint
    pub total_requests: AtomicU64,

    /// Requests that passed validation and the rate limiter
    pub requests_allowed: AtomicU64,
    /// Requests rejected by the rate limiter
    pub requests_throttled: AtomicU64,
    /// Requests rejected by location validation
    pub validation_failures: AtomicU64,
    /// Allowed requests that failed against the upstream provider
    pub upstream_errors: AtomicU64,

    /// Request latency buckets (in microseconds)
    pub latency_under_1ms: AtomicU64,
    pub latency_under_10ms: AtomicU64,
    pub latency_under_100ms: AtomicU64,
    pub latency_under_1s: AtomicU64,
    pub latency_over_1s: AtomicU64,

    /// Histogram support
    pub latency_sum_micros: AtomicU64,
    pub latency_count: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            start_time: Instant::now(),
            total_requests: AtomicU64::new(0),
            requests_allowed: AtomicU64::new(0),
            requests_throttled: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            upstream_errors: AtomicU64::new(0),
            latency_under_1ms: AtomicU64::new(0),
            latency_under_10ms: AtomicU64::new(0),
            latency_under_100ms: AtomicU64::new(0),
            latency_under_1s: AtomicU64::new(0),
            latency_over_1s: AtomicU64::new(0),
            latency_sum_micros: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
        }
    }

    /// Record a request that reached the rate limiter.
    pub fn record_request(&self, latency_us: u64, allowed: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if allowed {
            self.requests_allowed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_throttled.fetch_add(1, Ordering::Relaxed);
        }
        self.record_latency(latency_us);
    }

    /// Record a request rejected by location validation.
    pub fn record_validation_failure(&self, latency_us: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency_us);
    }

    /// Record an allowed request that failed upstream.
    pub fn record_upstream_error(&self, latency_us: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency_us);
    }

    fn record_latency(&self, latency_us: u64) {
        match latency_us {
            0..=999 => self.latency_under_1ms.fetch_add(1, Ordering::Relaxed),
            1000..=9999 => self.latency_under_10ms.fetch_add(1, Ordering::Relaxed),
            10000..=99999 => self.latency_under_100ms.fetch_add(1, Ordering::Relaxed),
            100000..=999999 => self.latency_under_1s.fetch_add(1, Ordering::Relaxed),
            _ => self.latency_over_1s.fetch_add(1, Ordering::Relaxed),
        };

        self.latency_sum_micros
            .fetch_add(latency_us, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics in Prometheus text format, including one
    /// `weathergate_tokens_remaining` gauge per limiter token.
    pub fn export_prometheus(&self, tokens: &[TokenState]) -> String {
        let mut output = String::with_capacity(2048);

        output.push_str("# HELP weathergate_uptime_seconds Time since server start in seconds\n");
        output.push_str("# TYPE weathergate_uptime_seconds gauge\n");
        output.push_str(&format!(
            "weathergate_uptime_seconds {}\n\n",
            self.uptime_seconds()
        ));

        output.push_str("# HELP weathergate_requests_total Total weather requests processed\n");
        output.push_str("# TYPE weathergate_requests_total counter\n");
        output.push_str(&format!(
            "weathergate_requests_total {}\n\n",
            self.total_requests.load(Ordering::Relaxed)
        ));

        output.push_str(
            "# HELP weathergate_requests_allowed Requests that passed validation and the rate limiter\n",
        );
        output.push_str("# TYPE weathergate_requests_allowed counter\n");
        output.push_str(&format!(
            "weathergate_requests_allowed {}\n\n",
            self.requests_allowed.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP weathergate_requests_throttled Requests rejected by the rate limiter\n");
        output.push_str("# TYPE weathergate_requests_throttled counter\n");
        output.push_str(&format!(
            "weathergate_requests_throttled {}\n\n",
            self.requests_throttled.load(Ordering::Relaxed)
        ));

        output.push_str(
            "# HELP weathergate_validation_failures Requests rejected by location validation\n",
        );
        output.push_str("# TYPE weathergate_validation_failures counter\n");
        output.push_str(&format!(
            "weathergate_validation_failures {}\n\n",
            self.validation_failures.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP weathergate_upstream_errors Requests that failed upstream\n");
        output.push_str("# TYPE weathergate_upstream_errors counter\n");
        output.push_str(&format!(
            "weathergate_upstream_errors {}\n\n",
            self.upstream_errors.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP weathergate_tokens_remaining Remaining uses per rate limiter token\n");
        output.push_str("# TYPE weathergate_tokens_remaining gauge\n");
        for token in tokens {
            output.push_str(&format!(
                "weathergate_tokens_remaining{{key=\"{}\"}} {}\n",
                token.key, token.remaining
            ));
        }
        output.push('\n');

        output.push_str("# HELP weathergate_request_duration_bucket Request latency distribution\n");
        output.push_str("# TYPE weathergate_request_duration_bucket histogram\n");
        let under_1ms = self.latency_under_1ms.load(Ordering::Relaxed);
        let under_10ms = under_1ms + self.latency_under_10ms.load(Ordering::Relaxed);
        let under_100ms = under_10ms + self.latency_under_100ms.load(Ordering::Relaxed);
        let under_1s = under_100ms + self.latency_under_1s.load(Ordering::Relaxed);
        let total = under_1s + self.latency_over_1s.load(Ordering::Relaxed);
        output.push_str(&format!(
            "weathergate_request_duration_bucket{{le=\"0.001\"}} {under_1ms}\n"
        ));
        output.push_str(&format!(
            "weathergate_request_duration_bucket{{le=\"0.01\"}} {under_10ms}\n"
        ));
        output.push_str(&format!(
            "weathergate_request_duration_bucket{{le=\"0.1\"}} {under_100ms}\n"
        ));
        output.push_str(&format!(
            "weathergate_request_duration_bucket{{le=\"1\"}} {under_1s}\n"
        ));
        output.push_str(&format!(
            "weathergate_request_duration_bucket{{le=\"+Inf\"}} {total}\n"
        ));
        output.push_str(&format!(
            "weathergate_request_duration_sum {}\n",
            self.latency_sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
        ));
        output.push_str(&format!(
            "weathergate_request_duration_count {}\n",
            self.latency_count.load(Ordering::Relaxed)
        ));

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
