//! Relays accepted submissions to the automation webhooks.
//!
//! The forwarder owns a single pooled `reqwest::Client`. Documents are enriched with a
//! `_meta` object describing the original request before they leave the service.

use std::time::Duration;

use axum::http::{header, HeaderMap};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForwardError {
    /// The webhook answered with a non-2xx status. `body` is its text, possibly empty.
    #[error("webhook responded with status {status}")]
    Status { status: u16, body: String },
    /// Connect, timeout or protocol failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Request details attached to every forwarded document as `_meta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMeta {
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: String,
}

impl RequestMeta {
    pub fn from_headers(headers: &HeaderMap, ip: String) -> Self {
        let text = |name: header::HeaderName| {
            headers.get(name).map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        };
        Self {
            ts: chrono::Utc::now().timestamp_millis(),
            user_agent: text(header::USER_AGENT),
            referer: text(header::REFERER),
            ip,
        }
    }
}

/// Serialize `document` and add the `_meta` key next to its own fields.
pub fn enrich<T: Serialize>(document: &T, meta: &RequestMeta) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(document)?;
    if let Value::Object(map) = &mut value {
        map.insert("_meta".to_string(), serde_json::to_value(meta)?);
    }
    Ok(value)
}

#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// POST `document` as JSON to `url`.
    ///
    /// Returns the webhook's JSON reply, or `None` when the reply is empty or not JSON.
    pub async fn forward(&self, url: &str, document: &Value) -> Result<Option<Value>, ForwardError> {
        let res = self.client.post(url).json(document).send().await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ForwardError::Status { status: status.as_u16(), body });
        }

        let data = match res.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).ok(),
            Err(e) => {
                tracing::debug!("Discarding unreadable webhook reply: {}", e);
                None
            }
        };
        Ok(data)
    }
}
