use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Request counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub requests_total: Arc<AtomicU64>,
    pub rate_limited: Arc<AtomicU64>,
    pub honeypot_hits: Arc<AtomicU64>,
    pub validation_failed: Arc<AtomicU64>,
    pub forwarded_ok: Arc<AtomicU64>,
    pub upstream_errors: Arc<AtomicU64>,
    pub internal_errors: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            requests_total: Arc::new(AtomicU64::new(0)),
            rate_limited: Arc::new(AtomicU64::new(0)),
            honeypot_hits: Arc::new(AtomicU64::new(0)),
            validation_failed: Arc::new(AtomicU64::new(0)),
            forwarded_ok: Arc::new(AtomicU64::new(0)),
            upstream_errors: Arc::new(AtomicU64::new(0)),
            internal_errors: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_requests(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_honeypot(&self) {
        self.honeypot_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_validation_failed(&self) {
        self.validation_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_forwarded(&self) {
        self.forwarded_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_upstream_errors(&self) {
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_internal_errors(&self) {
        self.internal_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            honeypot_hits: self.honeypot_hits.load(Ordering::Relaxed),
            validation_failed: self.validation_failed.load(Ordering::Relaxed),
            forwarded_ok: self.forwarded_ok.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
            internal_errors: self.internal_errors.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub rate_limited: u64,
    pub honeypot_hits: u64,
    pub validation_failed: u64,
    pub forwarded_ok: u64,
    pub upstream_errors: u64,
    pub internal_errors: u64,
    pub uptime_seconds: u64,
}
