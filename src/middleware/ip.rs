use axum::{
    extract::{connect_info::ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::SocketAddr;

/// Key used when neither proxy headers nor transport metadata name the client.
pub const UNKNOWN_CLIENT_IP: &str = "0.0.0.0";

/// Resolve the client identity used as rate-limit key and forwarded in `_meta.ip`.
///
/// The first `X-Forwarded-For` entry is taken verbatim (trimmed, not parsed), then
/// `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(h) = headers.get("x-forwarded-for").and_then(|hv| hv.to_str().ok()) {
        let first = h.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }
    if let Some(h) = headers.get("x-real-ip").and_then(|hv| hv.to_str().ok()) {
        let real = h.trim();
        if !real.is_empty() {
            return real.to_string();
        }
    }
    match peer {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN_CLIENT_IP.to_string(),
    }
}

/// Optional extractor for remote socket address. Unlike `ConnectInfo`, this never rejects
/// if the connection info extension is absent (e.g. in tests or custom services).
#[derive(Clone, Copy, Debug, Default)]
pub struct MaybeRemoteAddr(pub Option<SocketAddr>);

impl MaybeRemoteAddr {
    pub fn from_parts(parts: &Parts) -> Self {
        MaybeRemoteAddr(parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|info| info.0))
    }
}

impl<S> FromRequestParts<S> for MaybeRemoteAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeRemoteAddr::from_parts(parts))
    }
}
