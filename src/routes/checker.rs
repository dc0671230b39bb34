use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
};

use super::submission::{deliver, parse_body, record, Submission};
use crate::error::{AppError, AppResult};
use crate::middleware::ip::MaybeRemoteAddr;
use crate::state::AppState;
use crate::validation::{honeypot_tripped, validate_checker};

/// Variable operators set to enable this form.
pub const WEBHOOK_VAR: &str = "N8N_CHECKER_WEBHOOK_URL";

/// `POST /api/checker`
///
/// Honeypot, validation, enrichment and forwarding of the freight checker form.
/// The rate limiter has already run as route middleware.
pub async fn submit_checker(
    State(state): State<AppState>,
    MaybeRemoteAddr(peer): MaybeRemoteAddr,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Submission> {
    let outcome = async {
        let body = parse_body(body, state.config.server.max_body_bytes)?;
        if honeypot_tripped(&body) {
            return Ok(Submission::Deflected);
        }

        let payload = validate_checker(&body).map_err(|issues| AppError::Validation {
            message: issues.first_message().unwrap_or("Bad Request").to_string(),
            missing: Vec::new(),
        })?;

        let url = state.config.webhook.checker().ok_or(AppError::MissingWebhook(WEBHOOK_VAR))?;
        deliver(&state, url, &headers, peer, &payload).await
    }
    .await;

    record(&state.metrics, "checker", &outcome);
    outcome
}
