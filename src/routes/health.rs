use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Health check endpoint - lightweight, no rate limiting
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: a submission can only succeed once a webhook is configured
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let webhook = &state.config.webhook;
    if webhook.checker().is_some() || webhook.cotizador().is_some() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready: no webhook configured")
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.get_snapshot())
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let counters = [
        ("requests_total", "Form submissions received", m.requests_total),
        ("rate_limited", "Submissions rejected by the rate limiter", m.rate_limited),
        ("honeypot_hits", "Submissions deflected by the honeypot", m.honeypot_hits),
        ("validation_failed", "Submissions failing validation", m.validation_failed),
        ("forwarded_ok", "Submissions accepted by the webhook", m.forwarded_ok),
        ("upstream_errors", "Non-2xx webhook replies", m.upstream_errors),
        ("internal_errors", "Parse, configuration and transport failures", m.internal_errors),
    ];
    let mut body = String::new();
    for (name, help, value) in counters {
        body.push_str(&format!(
            "# HELP globaltrip_{name} {help}\n# TYPE globaltrip_{name} counter\nglobaltrip_{name} {value}\n"
        ));
    }
    body.push_str(&format!(
        "# HELP globaltrip_uptime_seconds Uptime seconds\n# TYPE globaltrip_uptime_seconds gauge\nglobaltrip_uptime_seconds {}\n",
        m.uptime_seconds
    ));
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
