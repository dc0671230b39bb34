//! Steps shared by the form endpoints after the rate limiter has admitted a request.

use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::net::SocketAddr;

use crate::error::{AppError, AppResult};
use crate::forwarder::{enrich, RequestMeta};
use crate::metrics::Metrics;
use crate::middleware::ip::client_ip;
use crate::state::AppState;

/// Successful outcome of a form submission.
#[derive(Debug)]
pub enum Submission {
    /// The honeypot was filled; answered as success, nothing forwarded.
    Deflected,
    /// The webhook accepted the document. Carries its JSON reply, if any.
    Forwarded(Option<Value>),
}

impl IntoResponse for Submission {
    fn into_response(self) -> Response {
        match self {
            Submission::Deflected => Json(json!({ "ok": true })).into_response(),
            Submission::Forwarded(data) => Json(json!({ "ok": true, "data": data })).into_response(),
        }
    }
}

/// Parse the raw body. Malformed JSON surfaces as a 500 carrying the parser message.
///
/// Bodies without a declared length are only capped while buffering, so the body
/// limit rejection is mapped here rather than in the request guard.
pub fn parse_body(body: Result<Bytes, BytesRejection>, limit: usize) -> AppResult<Value> {
    let body = body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge { limit },
        _ => AppError::Internal(rejection.body_text()),
    })?;
    Ok(serde_json::from_slice(&body)?)
}

/// Attach `_meta` to `document` and post it to `url`.
pub async fn deliver<T: Serialize>(
    state: &AppState,
    url: &str,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    document: &T,
) -> AppResult<Submission> {
    let ip = client_ip(headers, peer);
    let meta = RequestMeta::from_headers(headers, ip);
    let enriched = enrich(document, &meta)?;

    let data = state.forwarder.forward(url, &enriched).await?;
    tracing::info!(client_ip = %meta.ip, "Submission forwarded");
    Ok(Submission::Forwarded(data))
}

/// Update counters and log the outcome of one submission.
pub fn record(metrics: &Metrics, form: &'static str, outcome: &AppResult<Submission>) {
    match outcome {
        Ok(Submission::Deflected) => {
            metrics.inc_honeypot();
            tracing::info!(form, "Honeypot filled, submission dropped");
        }
        Ok(Submission::Forwarded(_)) => metrics.inc_forwarded(),
        Err(AppError::Validation { message, .. }) => {
            metrics.inc_validation_failed();
            tracing::debug!(form, %message, "Submission rejected by validation");
        }
        Err(AppError::Upstream { status, .. }) => {
            metrics.inc_upstream_errors();
            tracing::warn!(form, status, "Webhook rejected submission");
        }
        Err(AppError::Internal(_)) | Err(AppError::MissingWebhook(_)) => metrics.inc_internal_errors(),
        Err(_) => {}
    }
}
