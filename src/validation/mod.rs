//! Payload validation for the form endpoints.
//!
//! Validators work on the raw `serde_json::Value` rather than a derived `Deserialize`
//! so every failure produces a stable, client-facing message and all issues are
//! collected in field order. Handlers return the first one.
//!
//! - `checker`: the freight checker form
//! - `quote`: the full courier quote form

pub mod checker;
pub mod quote;

use serde_json::{Map, Value};

pub use checker::{validate_checker, CheckerPayload};
pub use quote::{validate_quote, Origin, Package, Product, QuoteRequest};

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Dotted location of the offending value, `""` for the body itself.
    pub path: String,
    pub message: String,
}

/// Ordered collection of issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Issues(Vec<Issue>);

impl Issues {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(Issue { path: path.into(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first_message(&self) -> Option<&str> {
        self.0.first().map(|i| i.message.as_str())
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|i| i.message.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut issues = Self::new();
        issues.push(path, message);
        issues
    }
}

/// JSON type names as they appear in `Expected ..., received <type>` messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The body must be a JSON object for any field rule to apply.
pub fn expect_object(body: &Value) -> Result<&Map<String, Value>, Issues> {
    body.as_object()
        .ok_or_else(|| Issues::single("", format!("Expected object, received {}", json_type_name(body))))
}

/// True when the hidden `_hp` field carries anything but whitespace.
///
/// Humans never see the field, so a filled value marks an automated submission.
pub fn honeypot_tripped(body: &Value) -> bool {
    body.get("_hp")
        .and_then(Value::as_str)
        .map(|hp| !hp.trim().is_empty())
        .unwrap_or(false)
}

/// Syntactic email check.
///
/// Local part: `[A-Za-z0-9_'+.-]`, no leading dot, no `..`, ending in `[A-Za-z0-9_+-]`.
/// Domain: two or more labels of alphanumerics and `-`, each starting alphanumeric,
/// with an alphabetic TLD of at least two characters.
pub fn is_email(input: &str) -> bool {
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.starts_with('.') || local.contains("..") {
        return false;
    }
    if !local.chars().all(|c| c.is_ascii_alphanumeric() || "_'+-.".contains(c)) {
        return false;
    }
    match local.chars().last() {
        Some(c) if c.is_ascii_alphanumeric() || "_+-".contains(c) => {}
        _ => return false,
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, hosts)) = labels.split_last() else {
        return false;
    };
    if hosts.is_empty() {
        return false;
    }
    let hosts_ok = hosts.iter().all(|label| {
        label.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    hosts_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Lenient number coercion used by the quote form.
///
/// Numbers pass through; strings are read like `parseFloat` (longest numeric prefix);
/// everything else, and any non-finite result, becomes `0`.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_float_prefix(s),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Whole-value positivity check used for required quantities.
///
/// Unlike [`coerce_number`], a string must be numeric in its entirety (surrounding
/// whitespace aside), so `"12abc"` is not positive.
pub fn is_positive(value: Option<&Value>) -> bool {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    n.is_some_and(|n| n.is_finite() && n > 0.0)
}

fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let mut end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    while end > 0 {
        if let Ok(n) = s[..end].parse::<f64>() {
            return n;
        }
        end -= 1;
    }
    0.0
}
