use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error;
use std::fmt;

use crate::forwarder::ForwardError;

/// Message returned to clients that exceed the request quota.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Try again in a minute.";

/// The primary error type for the application.
///
/// Every variant renders as `{"ok": false, "error": "..."}` so the forms can show
/// `error` verbatim.
#[derive(Debug)]
pub enum AppError {
    /// The client exhausted its quota for the current window.
    RateLimited {
        /// The number of seconds until the window resets.
        retry_after_seconds: u64,
    },
    /// The payload failed validation. `message` is the first issue;
    /// `missing` lists every field label for forms that show a checklist.
    Validation { message: String, missing: Vec<String> },
    /// The request body exceeds the configured limit.
    PayloadTooLarge { limit: usize },
    /// No webhook configured for the route. Carries the variable name operators must set.
    MissingWebhook(&'static str),
    /// The webhook answered with a non-2xx status.
    Upstream { status: u16, message: String },
    /// Anything else: malformed JSON, transport failures. The message is shown to the client.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::RateLimited { retry_after_seconds } => {
                write!(f, "Rate limited. Retry after {} seconds", retry_after_seconds)
            }
            AppError::Validation { message, .. } => write!(f, "Validation failed: {}", message),
            AppError::PayloadTooLarge { limit } => {
                write!(f, "Request body exceeds maximum size of {} bytes", limit)
            }
            AppError::MissingWebhook(var) => write!(f, "Webhook not configured: {}", var),
            AppError::Upstream { status, message } => {
                write!(f, "Webhook error ({}): {}", status, message)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MissingWebhook(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text placed in the `error` field of the response body.
    pub fn client_message(&self) -> String {
        match self {
            AppError::RateLimited { .. } => RATE_LIMITED_MESSAGE.to_string(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::PayloadTooLarge { limit } => {
                format!("Request body exceeds maximum size of {} bytes", limit)
            }
            AppError::MissingWebhook(var) => format!("Falta {}", var),
            AppError::Upstream { message, .. } => message.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "ok": false,
            "error": self.client_message(),
        });

        match &self {
            AppError::Validation { missing, .. } if !missing.is_empty() => {
                body["missing"] = json!(missing);
            }
            AppError::Internal(msg) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Internal error: {}", msg);
            }
            AppError::MissingWebhook(var) => {
                tracing::error!("Webhook not configured, set {}", var);
            }
            _ => {}
        }

        let mut res = (status, Json(body)).into_response();
        if let AppError::RateLimited { retry_after_seconds } = self {
            if let Ok(v) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
                res.headers_mut().insert(header::RETRY_AFTER, v);
            }
        }
        res
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ForwardError> for AppError {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::Status { status, body } => {
                let message = if body.is_empty() { format!("Webhook error ({})", status) } else { body };
                AppError::Upstream { status, message }
            }
            ForwardError::Transport(e) => AppError::Internal(e.to_string()),
        }
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;
