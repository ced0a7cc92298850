//! Structural validation of book payloads.
//!
//! The rules live in a declarative table ([`BOOK_SCHEMA`]) checked by the generic
//! [`validate`] function. Fields not named in the table are accepted as-is.

use serde_json::{Map, Value};

/// JSON type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
}

impl FieldKind {
    fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64(),
        }
    }
}

/// Constraints on a single payload field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Whether an explicit `null` is accepted in place of a value.
    pub nullable: bool,
    /// Inclusive lower bound for integer fields.
    pub minimum: Option<i64>,
}

impl FieldRule {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            nullable: false,
            minimum: None,
        }
    }

    const fn at_least(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }
}

/// Every field of a book is mandatory on create and on full update.
pub const BOOK_SCHEMA: &[FieldRule] = &[
    FieldRule::required("isbn", FieldKind::String),
    FieldRule::required("amazon_url", FieldKind::String),
    FieldRule::required("author", FieldKind::String),
    FieldRule::required("language", FieldKind::String),
    FieldRule::required("pages", FieldKind::Integer).at_least(1),
    FieldRule::required("publisher", FieldKind::String),
    FieldRule::required("title", FieldKind::String),
    FieldRule::required("year", FieldKind::Integer),
];

/// Outcome of checking a payload against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Check `payload` against `schema`, collecting one message per violation.
pub fn validate(payload: &Value, schema: &[FieldRule]) -> ValidationResult {
    let errors = match payload.as_object() {
        Some(object) => schema
            .iter()
            .filter_map(|rule| check_field(object, rule))
            .collect(),
        None => vec!["instance is not of a type(s) object".to_string()],
    };

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_field(object: &Map<String, Value>, rule: &FieldRule) -> Option<String> {
    let value = match object.get(rule.name) {
        None if rule.required => {
            return Some(format!("instance requires property \"{}\"", rule.name))
        }
        None => return None,
        Some(Value::Null) if rule.nullable => return None,
        Some(value) => value,
    };

    if !rule.kind.matches(value) {
        return Some(format!(
            "instance.{} is not of a type(s) {}",
            rule.name,
            rule.kind.name()
        ));
    }

    match (rule.minimum, value.as_i64()) {
        (Some(minimum), Some(n)) if n < minimum => Some(format!(
            "instance.{} must be greater than or equal to {}",
            rule.name, minimum
        )),
        _ => None,
    }
}
