use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
};

use super::submission::{deliver, parse_body, record, Submission};
use crate::error::{AppError, AppResult};
use crate::freight::QuoteDocument;
use crate::middleware::ip::MaybeRemoteAddr;
use crate::state::AppState;
use crate::validation::{honeypot_tripped, validate_quote, Issues};

/// Variable operators set to enable this form.
pub const WEBHOOK_VAR: &str = "N8N_COTIZADOR_WEBHOOK_URL";

/// `POST /api/cotizador`
///
/// Same pipeline as the checker, but totals are recomputed server-side and the
/// forwarded document is the structured quote rather than the raw form.
pub async fn submit_quote(
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

        let request = validate_quote(&body).map_err(missing_fields)?;
        let url = state.config.webhook.cotizador().ok_or(AppError::MissingWebhook(WEBHOOK_VAR))?;

        let document = QuoteDocument::build(request, &state.config.quote);
        deliver(&state, url, &headers, peer, &document).await
    }
    .await;

    record(&state.metrics, "cotizador", &outcome);
    outcome
}

/// Field issues become a checklist; a body that is not an object is reported as is.
fn missing_fields(issues: Issues) -> AppError {
    match issues.iter().next() {
        Some(issue) if issue.path.is_empty() => {
            AppError::Validation { message: issue.message.clone(), missing: Vec::new() }
        }
        Some(issue) => AppError::Validation {
            message: format!("Falta completar: {}", issue.message),
            missing: issues.messages(),
        },
        None => AppError::Validation { message: "Bad Request".to_string(), missing: Vec::new() },
    }
}
