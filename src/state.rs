use std::sync::Arc;

use crate::config::AppConfig;
use crate::forwarder::Forwarder;
use crate::metrics::Metrics;
use crate::middleware::FixedWindowLimiter;

/// The shared application state.
///
/// Cheap to clone; every field is a handle onto shared data so handlers, middleware
/// and the cleanup task see the same limiter and counters.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Request counters exposed under `/metrics`.
    pub metrics: Metrics,
    /// Per-client quota shared by all form endpoints.
    pub rate_limiter: FixedWindowLimiter,
    /// HTTP client posting accepted submissions to the webhooks.
    pub forwarder: Forwarder,
}

impl AppState {
    /// Creates a new `AppState` from a validated configuration.
    ///
    /// # Errors
    ///
    /// Fails only if the outbound HTTP client cannot be built.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let rate_limiter =
            FixedWindowLimiter::new(config.rate_limit.max_requests, config.rate_limit.window());
        let forwarder = Forwarder::new(config.webhook.timeout())?;

        Ok(Self {
            config: Arc::new(config),
            metrics: Metrics::new(),
            rate_limiter,
            forwarder,
        })
    }
}
