//! Ingestion boundary: coerce loosely typed relation payloads into entries.
//!
//! Accepted shapes:
//! - a JSON array of rows
//! - an object wrapping the array under `entries` or `data`
//!
//! Row fields are coerced once here so the domain can rely on a fixed shape.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, RelationEntry};

const WRAPPER_KEYS: [&str; 2] = ["entries", "data"];

/// Parse a JSON relation payload.
#[instrument(level = "debug", skip_all, fields(bytes = json.len()))]
pub fn parse_entries(json: &str) -> ApplicationResult<Vec<RelationEntry>> {
    let value: Value = serde_json::from_str(json).map_err(|e| ApplicationError::Payload {
        message: e.to_string(),
    })?;
    entries_from_value(value)
}

/// Coerce an already decoded payload.
pub fn entries_from_value(value: Value) -> ApplicationResult<Vec<RelationEntry>> {
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(mut map) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(rows)) => Some(rows),
                _ => None,
            })
            .ok_or_else(|| ApplicationError::Payload {
                message: format!("expected an array under one of {:?}", WRAPPER_KEYS),
            })?,
        other => {
            return Err(ApplicationError::Payload {
                message: format!("expected array or object, found {}", kind(&other)),
            })
        }
    };

    let entries = rows
        .iter()
        .enumerate()
        .map(|(index, row)| coerce_row(index, row))
        .collect::<Result<Vec<_>, DomainError>>()?;
    debug!("ingested {} entries", entries.len());
    Ok(entries)
}

fn coerce_row(index: usize, row: &Value) -> Result<RelationEntry, DomainError> {
    let invalid = |reason: String| DomainError::InvalidEntry { index, reason };

    let obj = row
        .as_object()
        .ok_or_else(|| invalid(format!("expected object, found {}", kind(row))))?;

    let id = match field(obj, &["id"]).and_then(scalar_string) {
        Some(id) => id,
        None => return Err(invalid("missing or empty id".to_string())),
    };

    let referrer_id = match field(obj, &["referrerId", "referrer_id"]) {
        None | Some(Value::Null) => None,
        Some(value) => match scalar_string(value) {
            Some(referrer) => Some(referrer),
            None if value.as_str().is_some() => None,
            None => return Err(invalid(format!("referrerId has type {}", kind(value)))),
        },
    };

    let level = match field(obj, &["level"]) {
        None | Some(Value::Null) => 0,
        Some(value) => coerce_level(value)
            .ok_or_else(|| invalid(format!("level is not a non-negative integer: {}", value)))?,
    };

    let qualifies = match field(obj, &["qualifies"]) {
        None | Some(Value::Null) => false,
        Some(value) => {
            coerce_bool(value).ok_or_else(|| invalid(format!("qualifies is not a flag: {}", value)))?
        }
    };

    Ok(RelationEntry {
        id,
        referrer_id,
        level,
        display_name: text(obj, &["displayName", "display_name", "name"]),
        email: text(obj, &["email"]),
        qualifies,
    })
}

fn field<'v>(obj: &'v Map<String, Value>, names: &[&str]) -> Option<&'v Value> {
    names.iter().find_map(|name| obj.get(*name))
}

/// Non-empty trimmed string from a string or number.
fn scalar_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn coerce_level(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn text(obj: &Map<String, Value>, names: &[&str]) -> String {
    match field(obj, names) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
