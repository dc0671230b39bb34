//! HTTP route handlers and router assembly.
//!
//! - `checker`: freight checker form endpoint
//! - `cotizador`: courier quote form endpoint
//! - `health`: liveness, readiness, metrics and version
//! - `submission`: pipeline steps shared by the form endpoints

pub mod checker;
pub mod cotizador;
pub mod health;
pub mod submission;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::CorsConfig;
use crate::middleware::{rate_limit, request_guard, security_headers};
use crate::state::AppState;

/// Build the complete application router.
///
/// Only the `/api` form routes sit behind the rate limiter; probes and metrics do not
/// count against a client's quota.
pub fn router(state: AppState) -> Router {
    let cfg = state.config.clone();

    let api = Router::new()
        .route("/api/checker", post(checker::submit_checker))
        .route("/api/cotizador", post(cotizador::submit_quote))
        .route_layer(from_fn_with_state(state.clone(), rate_limit::rate_limit_middleware));

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .merge(api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(cfg.server.max_body_bytes))
        .layer(from_fn_with_state(cfg.clone(), request_guard::request_guard_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&cfg.cors))
        .layer(from_fn_with_state(cfg, security_headers::security_headers_middleware))
}

/// CORS: explicit origins when configured; otherwise permissive in debug builds
/// (forms served by a local dev server) and same-origin only in release.
fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    if cfg.allowed_origins.is_empty() {
        return if cfg!(debug_assertions) { CorsLayer::permissive() } else { CorsLayer::new() };
    }
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o.trim()) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
