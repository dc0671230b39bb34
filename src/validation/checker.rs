use serde::Serialize;
use serde_json::{Map, Value};

use super::{expect_object, is_email, json_type_name, Issues};

const REQUIRED: &str = "Required";
const TOO_SHORT: &str = "String must contain at least 1 character(s)";
const INVALID_EMAIL: &str = "Invalid email";

/// A validated freight checker submission.
///
/// Unknown keys of the inbound body are dropped; optional fields default to `""`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckerPayload {
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    pub origen: String,
    pub destino: String,
    pub producto_descripcion: String,
    pub producto_link: String,
    #[serde(rename = "_hp")]
    pub honeypot: String,
}

#[derive(Clone, Copy)]
enum Check {
    None,
    NonEmpty,
    Email,
}

struct Fields<'a> {
    map: &'a Map<String, Value>,
    issues: Issues,
}

impl<'a> Fields<'a> {
    fn required(&mut self, key: &str, check: Check) -> String {
        let Some(value) = self.map.get(key) else {
            self.issues.push(key, REQUIRED);
            return String::new();
        };
        self.string(key, value, check)
    }

    fn optional(&mut self, key: &str) -> String {
        match self.map.get(key) {
            Some(value) => self.string(key, value, Check::None),
            None => String::new(),
        }
    }

    fn string(&mut self, key: &str, value: &Value, check: Check) -> String {
        let Some(s) = value.as_str() else {
            self.issues.push(key, format!("Expected string, received {}", json_type_name(value)));
            return String::new();
        };
        match check {
            Check::NonEmpty if s.is_empty() => self.issues.push(key, TOO_SHORT),
            Check::Email if !is_email(s) => self.issues.push(key, INVALID_EMAIL),
            _ => {}
        }
        s.to_string()
    }
}

/// Validate a checker body, collecting issues in field order.
pub fn validate_checker(body: &Value) -> Result<CheckerPayload, Issues> {
    let map = expect_object(body)?;
    let mut fields = Fields { map, issues: Issues::new() };

    let payload = CheckerPayload {
        nombre: fields.required("nombre", Check::NonEmpty),
        email: fields.required("email", Check::Email),
        telefono: fields.optional("telefono"),
        origen: fields.required("origen", Check::NonEmpty),
        destino: fields.required("destino", Check::NonEmpty),
        producto_descripcion: fields.optional("producto_descripcion"),
        producto_link: fields.optional("producto_link"),
        honeypot: fields.optional("_hp"),
    };

    if fields.issues.is_empty() {
        Ok(payload)
    } else {
        Err(fields.issues)
    }
}
