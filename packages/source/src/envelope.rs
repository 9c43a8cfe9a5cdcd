//! Response envelope validation.
//!
//! Expected shape:
//!
//! ```json
//! { "total": 2, "data": [...], "heatmapData": [...], "stats": {...} }
//! ```
//!
//! `data` is mandatory; a 2xx body without it is a failure, not an empty
//! result. Individual records that are not JSON objects are skipped.

use complaint_map_complaint_models::{AggregateStats, ComplaintRecord};
use serde_json::Value;

use crate::{ComplaintSnapshot, SourceError};

/// Parses a response body into a [`ComplaintSnapshot`].
///
/// # Errors
///
/// Returns [`SourceError::MalformedEnvelope`] if the body is not an object
/// or `data` is missing or not an array.
pub fn parse_envelope(body: &Value) -> Result<ComplaintSnapshot, SourceError> {
    let envelope = body.as_object().ok_or_else(|| SourceError::MalformedEnvelope {
        message: "response is not a JSON object".to_string(),
    })?;

    let data = match envelope.get("data") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(SourceError::MalformedEnvelope {
                message: format!("\"data\" is {} instead of an array", kind(other)),
            });
        }
        None => {
            return Err(SourceError::MalformedEnvelope {
                message: envelope
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(
                        || "response has no \"data\" field".to_string(),
                        String::from,
                    ),
            });
        }
    };

    let records = parse_records(data, "data");

    let heatmap_records = match envelope.get("heatmapData") {
        Some(Value::Array(items)) => Some(parse_records(items, "heatmapData")),
        Some(Value::Null) | None => None,
        Some(other) => {
            log::warn!("Ignoring \"heatmapData\" of type {}", kind(other));
            None
        }
    };

    let stats = match envelope.get("stats") {
        Some(Value::Null) | None => None,
        Some(value) => match serde_json::from_value::<AggregateStats>(value.clone()) {
            Ok(stats) => Some(stats),
            Err(e) => {
                log::warn!("Ignoring malformed \"stats\": {e}");
                None
            }
        },
    };

    let total = envelope
        .get("total")
        .and_then(Value::as_u64)
        .unwrap_or(records.len() as u64);

    Ok(ComplaintSnapshot {
        total,
        records,
        heatmap_records,
        stats,
    })
}

/// Extracts a human-readable reason from an error response body.
///
/// Prefers a string `message` or `error` field; falls back to
/// `HTTP <status>`.
#[must_use]
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|key| v.get(key).and_then(Value::as_str).map(String::from))
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

fn parse_records(items: &[Value], field: &str) -> Vec<ComplaintRecord> {
    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match serde_json::from_value::<ComplaintRecord>(item.clone()) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Skipping {field}[{idx}]: {e}"),
        }
    }
    records
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
