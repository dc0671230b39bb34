use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;

/// An Axum middleware screening requests before routing.
///
/// This middleware:
/// - rejects POST/PUT bodies whose declared `Content-Length` exceeds `server.max_body_bytes`
///   with `413` before any byte is read;
/// - logs user agents of well-known vulnerability scanners.
///
/// Bodies without a declared length are still capped by `DefaultBodyLimit`.
pub async fn request_guard_middleware(State(cfg): State<Arc<AppConfig>>, req: Request, next: Next) -> Response {
    if let Some(ua) = req.headers().get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
        if is_suspicious_user_agent(ua) {
            tracing::warn!(user_agent = %sanitize_for_logging(ua), "Suspicious user agent detected");
        }
    }

    if matches!(req.method(), &Method::POST | &Method::PUT) {
        let declared = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<usize>().ok());
        let limit = cfg.server.max_body_bytes;
        if let Some(length) = declared {
            if length > limit {
                tracing::warn!(length, limit, path = %req.uri().path(), "Rejecting oversized body");
                return AppError::PayloadTooLarge { limit }.into_response();
            }
        }
    }

    next.run(req).await
}

/// Check for suspicious user agents (simple heuristic)
fn is_suspicious_user_agent(ua: &str) -> bool {
    let ua_lower = ua.to_lowercase();
    // Only flag if it contains scanner OR if it contains crawler but NOT legitimate bots
    ua_lower.contains("scanner")
        || (ua_lower.contains("crawler") && !ua_lower.contains("googlebot") && !ua_lower.contains("bingbot"))
        || ua_lower.contains("nikto")
        || ua_lower.contains("sqlmap")
        || ua_lower.contains("havij")
        || ua_lower.contains("acunetix")
}

/// Strip control characters and cap length before echoing client input into logs.
pub fn sanitize_for_logging(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == ' ')
        .take(200)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspicious_user_agents() {
        assert!(is_suspicious_user_agent("nikto/2.1.5"));
        assert!(is_suspicious_user_agent("sqlmap/1.0"));
        assert!(is_suspicious_user_agent("random scanner bot"));

        assert!(!is_suspicious_user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"));
        assert!(!is_suspicious_user_agent("Googlebot/2.1 crawler"));
    }

    #[test]
    fn test_sanitize_for_logging() {
        assert_eq!(sanitize_for_logging("normal text"), "normal text");
        assert_eq!(sanitize_for_logging("line\nbreak\x00"), "linebreak");
        assert_eq!(sanitize_for_logging(&"a".repeat(300)).len(), 200);
    }
}
