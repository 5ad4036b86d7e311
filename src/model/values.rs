//! Extended scalar wire forms
//!
//! The model layer represents opaque scalars inside JSON documents with
//! reserved single-key wrappers:
//!
//! - raw binary: `{"$binary": "<base64>"}`
//! - internal binary (as stored by the model layer): `{"$binary": {"base64": "<base64>", "subType": n}}`
//! - object id: `{"$oid": "<24 hex chars>"}` or a bare 24-hex-char string
//! - decimal: `{"$numberDecimal": "<decimal string>"}`
//! - uuid: a bare RFC 4122 string
//! - date: a bare RFC 3339 string

use base64::Engine;
use serde_json::{Map, Value};

/// Returns whether `value` is the raw binary form
pub fn is_binary(value: &Value) -> bool {
    match value {
        Value::Object(map) if map.len() == 1 => match map.get("$binary") {
            Some(Value::String(s)) => base64::engine::general_purpose::STANDARD
                .decode(s)
                .is_ok(),
            _ => false,
        },
        _ => false,
    }
}

/// Returns whether `value` is the model layer's internal binary form
pub fn is_internal_binary(value: &Value) -> bool {
    match value {
        Value::Object(map) if map.len() == 1 => matches!(
            map.get("$binary"),
            Some(Value::Object(inner)) if inner.get("base64").map_or(false, Value::is_string)
        ),
        _ => false,
    }
}

/// Convert the internal binary form to the raw form
pub fn raw_binary_from_internal(value: &Value) -> Option<Value> {
    let inner = value.as_object()?.get("$binary")?.as_object()?;
    let base64_text = inner.get("base64")?.as_str()?;
    let mut map = Map::new();
    map.insert("$binary".to_string(), Value::String(base64_text.to_string()));
    Some(Value::Object(map))
}

/// Rewrite internal binary wrappers back to the raw form, descending one
/// container level (the value itself, object entries, array elements).
///
/// Returns `None` when no rewrite was needed, so callers can avoid copying
/// untouched values.
pub fn unwrap_binary_values(value: &Value) -> Option<Value> {
    if is_internal_binary(value) {
        return raw_binary_from_internal(value);
    }
    match value {
        Value::Object(map) => {
            if !map.values().any(is_internal_binary) {
                return None;
            }
            let mut rewritten = map.clone();
            for (_, entry) in rewritten.iter_mut() {
                if let Some(raw) = raw_binary_from_internal(entry) {
                    *entry = raw;
                }
            }
            Some(Value::Object(rewritten))
        }
        Value::Array(items) => {
            if !items.iter().any(is_internal_binary) {
                return None;
            }
            let rewritten = items
                .iter()
                .map(|item| raw_binary_from_internal(item).unwrap_or_else(|| item.clone()))
                .collect();
            Some(Value::Array(rewritten))
        }
        _ => None,
    }
}

/// Returns whether `value` is an object-id form
pub fn is_object_id(value: &Value) -> bool {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) if map.len() == 1 => match map.get("$oid") {
            Some(Value::String(s)) => s.as_str(),
            _ => return false,
        },
        _ => return false,
    };
    text.len() == 24 && text.chars().all(|c| c.is_ascii_hexdigit())
}

/// Returns whether `value` is a decimal form
pub fn is_decimal128(value: &Value) -> bool {
    match value {
        Value::Object(map) if map.len() == 1 => match map.get("$numberDecimal") {
            Some(Value::String(s)) => s.parse::<f64>().is_ok(),
            _ => false,
        },
        _ => false,
    }
}

/// Returns whether `value` is a UUID string
pub fn is_uuid(value: &Value) -> bool {
    match value {
        Value::String(s) => uuid::Uuid::parse_str(s).is_ok(),
        _ => false,
    }
}

/// Returns whether `value` is an RFC 3339 date string
pub fn is_date(value: &Value) -> bool {
    match value {
        Value::String(s) => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
        _ => false,
    }
}
