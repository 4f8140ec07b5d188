use serde_json::{Map, Value};

use super::types::Condition;
use crate::id::DocumentId;

/// In-process evaluation of filter conditions, mirroring what the SQL rendering
/// does in Postgres.
pub struct FilterMatch;

impl FilterMatch {
    pub fn condition(condition: &Condition, id: &DocumentId, body: &Map<String, Value>) -> bool {
        match condition {
            Condition::Equals { field, value } => body
                .get(field)
                .map(|stored| Self::text_equals(stored, value))
                .unwrap_or(false),
            Condition::PathEquals { path, value } => match path.split_first() {
                Some((head, rest)) => body
                    .get(head)
                    .map(|stored| Self::path_equals(stored, rest, value))
                    .unwrap_or(false),
                None => false,
            },
            Condition::IdEquals(value) => &id.to_hex() == value,
            Condition::Contains(fragment) => match fragment {
                Value::Object(needle) => needle
                    .iter()
                    .all(|(key, inner)| body.get(key).map(|v| Self::contains(v, inner)).unwrap_or(false)),
                _ => false,
            },
        }
    }

    /// Query value parsed as a finite number, if it is one.
    pub fn numeric(value: &str) -> Option<f64> {
        value.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    fn text_equals(stored: &Value, value: &str) -> bool {
        if let (Value::Number(n), Some(wanted)) = (stored, Self::numeric(value)) {
            return n.as_f64() == Some(wanted);
        }
        Self::text_form(stored).map(|text| text == value).unwrap_or(false)
    }

    /// Lax path walk: arrays are unwrapped at every step, leaves compare as
    /// strings or numbers.
    fn path_equals(stored: &Value, path: &[String], value: &str) -> bool {
        match (stored, path.split_first()) {
            (Value::Array(items), _) => items.iter().any(|item| Self::path_equals(item, path, value)),
            (Value::Object(map), Some((head, rest))) => map
                .get(head)
                .map(|inner| Self::path_equals(inner, rest, value))
                .unwrap_or(false),
            (Value::String(s), None) => s == value,
            (Value::Number(n), None) => Self::numeric(value).is_some_and(|wanted| n.as_f64() == Some(wanted)),
            _ => false,
        }
    }

    /// Same as the `->>` operator: strings unquoted, JSON null has no text form.
    pub fn text_form(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// JSONB containment (`haystack @> needle`).
    pub fn contains(haystack: &Value, needle: &Value) -> bool {
        match (haystack, needle) {
            (Value::Object(hay), Value::Object(need)) => need
                .iter()
                .all(|(key, inner)| hay.get(key).map(|v| Self::contains(v, inner)).unwrap_or(false)),
            (Value::Array(hay), Value::Array(need)) => need
                .iter()
                .all(|inner| hay.iter().any(|candidate| Self::contains(candidate, inner))),
            // A top-level array contains a bare scalar element
            (Value::Array(hay), scalar) if !scalar.is_object() => hay.iter().any(|candidate| candidate == scalar),
            (left, right) => left == right,
        }
    }
}
