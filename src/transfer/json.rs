//! JSON array documents ↔ dossiers.
//!
//! Export is a plain pretty-printed serde dump. Import is deliberately
//! loose: it reads a `serde_json::Value` and normalises each element the
//! same way the CSV mapper does, so hand-edited files still load.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::{Result, TransferError};
use super::mapper::parse_timestamp;
use crate::models::{clamp_friendliness, parse_friendliness, Dossier, PLACEHOLDER_NAME};

pub fn to_json(dossiers: &[Dossier]) -> Result<String> {
    Ok(serde_json::to_string_pretty(dossiers)?)
}

/// Parse a JSON array of dossier-like objects.
pub fn from_json(text: &str, now: DateTime<Utc>) -> Result<Vec<Dossier>> {
    let value: Value = serde_json::from_str(text)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(TransferError::NotAnArray {
                found: kind(&other),
            })
        }
    };

    let empty = Map::new();
    let dossiers = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let obj = item.as_object().unwrap_or_else(|| {
                log::warn!("element {} is {}, not an object; using defaults", i, kind(item));
                &empty
            });
            from_object(obj, now)
        })
        .collect();
    Ok(dossiers)
}

fn from_object(obj: &Map<String, Value>, now: DateTime<Utc>) -> Dossier {
    Dossier {
        id: text(obj, "id").unwrap_or_else(|| Uuid::new_v4().to_string()),
        full_name: text(obj, "full_name").unwrap_or_else(|| PLACEHOLDER_NAME.to_string()),
        dob: text(obj, "dob"),
        parents: text(obj, "parents"),
        history: text(obj, "history"),
        traumas: text(obj, "traumas"),
        habits: text(obj, "habits"),
        communication_style: text(obj, "communication_style"),
        friendliness_level: Some(friendliness(obj.get("friendliness_level"))),
        relation: text(obj, "relation"),
        last_contact_date: text(obj, "last_contact_date"),
        photo: text(obj, "photoDataUrl"),
        tags: tags(obj.get("tags")),
        created_at: timestamp(obj.get("created_at")).unwrap_or(now),
        updated_at: now,
    }
}

/// Non-empty string (numbers are accepted and stringified).
fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn friendliness(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| clamp_friendliness(f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => parse_friendliness(s),
        _ => 0,
    }
}

/// Only an array counts; non-string entries are skipped.
fn tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// RFC 3339 / `YYYY-MM-DD` strings, or epoch milliseconds.
fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
