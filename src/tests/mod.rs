//! Integration and unit tests for the quote backend.
//!
//! ## Test Modules
//!
//! - **checker_api_tests**: `/api/checker` end to end against a local webhook
//! - **quote_api_tests**: `/api/cotizador` end to end against a local webhook
//! - **validation_tests**: payload validation messages and ordering
//! - **freight_tests**: weight totals and the quote document
//! - **error_tests**: `AppError` rendering
//! - **config_tests**: configuration loading and validation
//! - **health_api_tests**: probes, metrics and version
//!
//! Run a single module with e.g. `cargo test checker_api_tests`.

pub mod freight_tests;
pub mod validation_tests;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::state::AppState;

/// A webhook bound to an ephemeral local port that records every JSON body it receives.
pub struct MockWebhook {
    pub url: String,
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl MockWebhook {
    pub async fn received(&self) -> Vec<Value> {
        self.received.lock().await.clone()
    }
}

/// Start a webhook answering every POST with `status`, `content_type` and `body`.
pub async fn spawn_webhook(status: StatusCode, content_type: &'static str, body: &'static str) -> MockWebhook {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let app = Router::new().route(
        "/hook",
        post(move |Json(v): Json<Value>| {
            let sink = sink.clone();
            async move {
                sink.lock().await.push(v);
                (status, [(header::CONTENT_TYPE, content_type)], body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockWebhook { url: format!("http://{}/hook", addr), received }
}

/// A URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/hook", addr)
}

pub fn test_config(checker_url: Option<String>, cotizador_url: Option<String>, max_requests: u32) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.webhook.checker_url = checker_url;
    cfg.webhook.cotizador_url = cotizador_url;
    cfg.webhook.timeout_secs = 5;
    cfg.rate_limit.max_requests = max_requests;
    cfg
}

pub fn test_app(cfg: AppConfig) -> (Router, AppState) {
    let state = AppState::new(cfg).unwrap();
    (crate::routes::router(state.clone()), state)
}

pub fn post_json(uri: &str, ip: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .header(header::USER_AGENT, "Mozilla/5.0 (test)")
        .header(header::REFERER, "https://globaltrip.test/checker")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
