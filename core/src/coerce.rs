//! Coercion of JSON fields into typed primitives.
//!
//! Every helper returns `Ok(None)` for an absent or null field. Values of the
//! wrong shape are errors, never silently dropped.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ParseError;
use crate::json::{field, wrong_type, JsonObject};

/// Graph's timestamp profile, e.g. `2012-10-05T09:12:31+0000`.
pub const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// String field. Numbers and booleans are rendered as text.
pub fn string(json: &JsonObject, key: &str) -> Result<Option<String>, ParseError> {
    match field(json, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(wrong_type(key, "string", other)),
    }
}

pub fn require_string(json: &JsonObject, key: &str) -> Result<String, ParseError> {
    string(json, key)?.ok_or_else(|| ParseError::MissingField(key.to_string()))
}

pub fn long(json: &JsonObject, key: &str) -> Result<Option<i64>, ParseError> {
    let invalid = |value: String| ParseError::InvalidNumber {
        field: key.to_string(),
        value,
    };
    match field(json, key) {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| invalid(n.to_string())),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid(s.clone())),
        Some(other) => Err(wrong_type(key, "number", other)),
    }
}

pub fn int(json: &JsonObject, key: &str) -> Result<Option<i32>, ParseError> {
    match long(json, key)? {
        None => Ok(None),
        Some(n) => i32::try_from(n).map(Some).map_err(|_| ParseError::InvalidNumber {
            field: key.to_string(),
            value: n.to_string(),
        }),
    }
}

pub fn boolean(json: &JsonObject, key: &str) -> Result<Option<bool>, ParseError> {
    match field(json, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) if s == "true" => Ok(Some(true)),
        Some(Value::String(s)) if s == "false" => Ok(Some(false)),
        Some(other) => Err(wrong_type(key, "boolean", other)),
    }
}

/// Timestamp field in Graph's ISO-8601 profile. RFC 3339 is accepted too.
pub fn datetime(json: &JsonObject, key: &str) -> Result<Option<DateTime<Utc>>, ParseError> {
    let Some(raw) = string(json, key)? else {
        return Ok(None);
    };
    parse_datetime(&raw)
        .map(Some)
        .map_err(|source| ParseError::Timestamp {
            field: key.to_string(),
            value: raw,
            source,
        })
}

pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_str(raw, ISO8601_FORMAT)
        .or_else(|err| DateTime::parse_from_rfc3339(raw).map_err(|_| err))
        .map(|dt| dt.with_timezone(&Utc))
}
