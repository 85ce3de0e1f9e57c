//! Lenient field extraction from JSON records
//!
//! Source files are produced by several upstream systems, so identifiers show
//! up as strings or bare numbers and amounts sometimes arrive quoted. Anything
//! that cannot be read as the expected type becomes `None` instead of failing
//! the whole file.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

/// Timestamp layouts tried in order after RFC 3339
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Read an opaque identifier
///
/// Numbers are kept in their textual JSON form and never converted back to a
/// numeric type, so `"00123"` and `123` stay distinct identifiers. Booleans
/// are never identifiers.
#[must_use]
pub fn identifier(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a float from a number or a numeric string; NaN and infinities become `None`
#[must_use]
pub fn number(record: &Map<String, Value>, key: &str) -> Option<f64> {
    let parsed = match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Read a timestamp from a date-time string or epoch milliseconds
#[must_use]
pub fn timestamp(record: &Map<String, Value>, key: &str) -> Option<NaiveDateTime> {
    match record.get(key)? {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

/// Parse a timestamp string with multiple format attempts
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}
