use super::ip::client_ip;
use axum::{
    extract::{connect_info::ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
struct Window {
    start: Instant,
    count: u32,
}

/// Outcome of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited {
        /// Time left until the key's window expires.
        retry_after: Duration,
    },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

/// A thread-safe fixed-window rate limiter keyed by client identity.
///
/// Each key owns a window `{start, count}`. Once more than `window` has elapsed since
/// `start` the window restarts at the current request; within a window at most
/// `max_requests` requests are admitted.
#[derive(Clone)]
pub struct FixedWindowLimiter {
    windows: Arc<RwLock<HashMap<String, Window>>>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    /// Creates a new `FixedWindowLimiter`.
    ///
    /// # Arguments
    ///
    /// * `max_requests` - Requests admitted per key and window.
    /// * `window` - Length of a window.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Checks and records a request for `key` at the current instant.
    pub async fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now()).await
    }

    /// Checks and records a request for `key` at `now`.
    ///
    /// A key is only stored once a request is admitted, so with a zero quota every
    /// request is rejected.
    pub async fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut windows = self.windows.write().await;

        let Some(cell) = windows.get_mut(key) else {
            if self.max_requests == 0 {
                return RateDecision::Limited { retry_after: self.window };
            }
            windows.insert(key.to_string(), Window { start: now, count: 1 });
            return RateDecision::Allowed;
        };

        // A clock that went backwards counts as zero elapsed time.
        let elapsed = now.saturating_duration_since(cell.start);
        if elapsed > self.window {
            *cell = Window { start: now, count: 1 };
            return RateDecision::Allowed;
        }

        if cell.count >= self.max_requests {
            return RateDecision::Limited { retry_after: self.window.saturating_sub(elapsed) };
        }

        cell.count += 1;
        RateDecision::Allowed
    }

    /// Drops keys whose window has expired at `now`.
    ///
    /// An expired window and an absent key behave identically on the next request,
    /// so this only bounds memory.
    pub async fn cleanup_expired(&self, now: Instant) -> usize {
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, cell| now.saturating_duration_since(cell.start) <= self.window);
        before - windows.len()
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }
}

/// Whole seconds a limited client should wait, never less than one.
pub fn retry_after_seconds(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

/// An Axum middleware applying the shared limiter to the form endpoints.
///
/// Runs before the body is read, so limited clients never reach parsing or the webhook.
pub async fn rate_limit_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let peer = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|info| info.0);
    let ip = client_ip(req.headers(), peer);
    state.metrics.inc_requests();

    match state.rate_limiter.check(&ip).await {
        RateDecision::Allowed => next.run(req).await,
        RateDecision::Limited { retry_after } => {
            state.metrics.inc_rate_limited();
            tracing::warn!(client_ip = %ip, path = %req.uri().path(), "Rate limit exceeded");
            AppError::RateLimited { retry_after_seconds: retry_after_seconds(retry_after) }.into_response()
        }
    }
}

/// A background task that periodically sweeps expired windows.
pub async fn cleanup_task(limiter: FixedWindowLimiter, every: Duration) {
    let mut interval = tokio::time::interval(every);

    loop {
        interval.tick().await;
        let removed = limiter.cleanup_expired(Instant::now()).await;
        if removed > 0 {
            tracing::debug!(removed, "Swept expired rate-limit windows");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "203.0.113.7";

    #[tokio::test]
    async fn test_admits_up_to_quota_then_rejects() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.check_at(KEY, t0).await.is_allowed());
        assert!(limiter.check_at(KEY, t0 + Duration::from_secs(1)).await.is_allowed());
        assert!(limiter.check_at(KEY, t0 + Duration::from_secs(2)).await.is_allowed());

        let decision = limiter.check_at(KEY, t0 + Duration::from_secs(10)).await;
        assert_eq!(decision, RateDecision::Limited { retry_after: Duration::from_secs(50) });
    }

    #[tokio::test]
    async fn test_window_resets_only_after_strictly_elapsed() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.check_at(KEY, t0).await.is_allowed());
        // Exactly at start + W the old window still applies.
        assert!(!limiter.check_at(KEY, t0 + Duration::from_secs(60)).await.is_allowed());
        assert!(limiter.check_at(KEY, t0 + Duration::from_millis(60_001)).await.is_allowed());
        // The reset counted the admitting request.
        assert!(!limiter.check_at(KEY, t0 + Duration::from_secs(61)).await.is_allowed());
    }

    #[tokio::test]
    async fn test_rejections_do_not_extend_window() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_secs(10));
        let t0 = Instant::now();

        for i in 0..2 {
            assert!(limiter.check_at(KEY, t0 + Duration::from_secs(i)).await.is_allowed());
        }
        for i in 2..10 {
            assert!(!limiter.check_at(KEY, t0 + Duration::from_secs(i)).await.is_allowed());
        }
        assert!(limiter.check_at(KEY, t0 + Duration::from_secs(11)).await.is_allowed());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.check_at("10.0.0.1", t0).await.is_allowed());
        assert!(limiter.check_at("10.0.0.2", t0).await.is_allowed());
        assert!(!limiter.check_at("10.0.0.1", t0).await.is_allowed());
        assert!(!limiter.check_at("10.0.0.2", t0).await.is_allowed());
    }

    #[tokio::test]
    async fn test_zero_quota_rejects_every_request() {
        let limiter = FixedWindowLimiter::new(0, Duration::from_secs(5));
        let t0 = Instant::now();

        for secs in [0, 1, 6, 12, 60] {
            let decision = limiter.check_at(KEY, t0 + Duration::from_secs(secs)).await;
            assert_eq!(decision, RateDecision::Limited { retry_after: Duration::from_secs(5) });
        }
        assert_eq!(limiter.tracked_keys().await, 0);
    }

    #[tokio::test]
    async fn test_rejected_new_key_is_not_stored() {
        let limiter = FixedWindowLimiter::new(0, Duration::from_secs(60));
        limiter.check_at("10.0.0.1", Instant::now()).await;
        limiter.check_at("10.0.0.2", Instant::now()).await;
        assert_eq!(limiter.tracked_keys().await, 0);
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_expired() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_secs(10));
        let t0 = Instant::now();

        limiter.check_at("old", t0).await;
        limiter.check_at("fresh", t0 + Duration::from_secs(8)).await;
        assert_eq!(limiter.tracked_keys().await, 2);

        let removed = limiter.cleanup_expired(t0 + Duration::from_secs(11)).await;
        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_seconds(Duration::from_millis(1500)), 2);
        assert_eq!(retry_after_seconds(Duration::from_secs(30)), 30);
        assert_eq!(retry_after_seconds(Duration::ZERO), 1);
    }
}
