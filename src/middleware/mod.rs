//! Middleware components for HTTP request processing.
//!
//! - `ip`: client identity from proxy headers or the socket peer
//! - `rate_limit`: fixed-window quota for the form endpoints
//! - `request_guard`: early body-size rejection and scanner logging
//! - `security_headers`: response hardening headers

pub mod ip;
pub mod rate_limit;
pub mod request_guard;
pub mod security_headers;

pub use rate_limit::{FixedWindowLimiter, RateDecision};
