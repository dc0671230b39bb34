//! # GlobalTrip Quotes Backend Library
//!
//! Backend for the GlobalTrip quote-request forms: a freight "checker" and a full
//! courier "cotizador". Each submission passes through a single pipeline:
//!
//! rate limit → honeypot → validation → enrichment → webhook → response mapping
//!
//! The accepted document is relayed to an automation webhook (n8n); the service keeps
//! no state beyond an in-memory per-client request window.
//!
//! ## Core Components
//!
//! - [`config`]: Layered configuration (embedded defaults, files, environment)
//! - [`error`]: `AppError` and its `{"ok": false, "error": ...}` rendering
//! - [`forwarder`]: Webhook client and `_meta` enrichment
//! - [`freight`]: Volumetric/chargeable weight and the quote document
//! - [`metrics`]: Submission counters
//! - [`middleware`]: Client IP, rate limiting, request guard, security headers
//! - [`routes`]: HTTP handlers and router assembly
//! - [`state`]: Shared application state
//! - [`validation`]: Checker and quote payload validation

pub mod config;
pub mod error;
pub mod forwarder;
pub mod freight;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod validation;

#[cfg(test)]
mod tests;
