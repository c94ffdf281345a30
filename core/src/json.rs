//! Raw JSON access.
//!
//! Response bodies are parsed into a `serde_json` tree and read through the
//! helpers below. An explicit `null` and a missing key are treated the same:
//! both read as "not present".

use serde_json::{Map, Value};

use crate::error::ParseError;

pub type JsonObject = Map<String, Value>;

/// Parse a response body whose top level must be a JSON object.
pub fn parse_object(body: &str) -> Result<JsonObject, ParseError> {
    match serde_json::from_str(body)? {
        Value::Object(map) => Ok(map),
        other => Err(wrong_type("<root>", "object", &other)),
    }
}

/// Value under `key`, or `None` when the key is absent or null.
pub fn field<'a>(json: &'a JsonObject, key: &str) -> Option<&'a Value> {
    json.get(key).filter(|v| !v.is_null())
}

/// Nested object under `key`.
pub fn object<'a>(json: &'a JsonObject, key: &str) -> Result<Option<&'a JsonObject>, ParseError> {
    match field(json, key) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(wrong_type(key, "object", other)),
    }
}

/// Nested array under `key`.
pub fn array<'a>(json: &'a JsonObject, key: &str) -> Result<Option<&'a Vec<Value>>, ParseError> {
    match field(json, key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(wrong_type(key, "array", other)),
    }
}

pub fn require_object<'a>(json: &'a JsonObject, key: &str) -> Result<&'a JsonObject, ParseError> {
    object(json, key)?.ok_or_else(|| ParseError::MissingField(key.to_string()))
}

pub fn require_array<'a>(json: &'a JsonObject, key: &str) -> Result<&'a Vec<Value>, ParseError> {
    array(json, key)?.ok_or_else(|| ParseError::MissingField(key.to_string()))
}

/// Interpret an array element as an object. `field` names the array for errors.
pub fn element<'a>(value: &'a Value, field: &str) -> Result<&'a JsonObject, ParseError> {
    value.as_object().ok_or_else(|| wrong_type(field, "object", value))
}

pub(crate) fn wrong_type(field: &str, expected: &'static str, found: &Value) -> ParseError {
    ParseError::WrongType {
        field: field.to_string(),
        expected,
        found: type_name(found),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> JsonObject {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn null_and_absent_read_the_same() {
        let json = obj(json!({ "a": null }));
        assert!(field(&json, "a").is_none());
        assert!(field(&json, "b").is_none());
        assert!(object(&json, "a").unwrap().is_none());
        assert!(array(&json, "b").unwrap().is_none());
    }

    #[test]
    fn object_rejects_wrong_type() {
        let json = obj(json!({ "from": "someone" }));
        let err = object(&json, "from").unwrap_err();
        assert!(matches!(
            err,
            ParseError::WrongType { expected: "object", found: "string", .. }
        ));
    }

    #[test]
    fn require_array_reports_missing_field() {
        let json = obj(json!({}));
        let err = require_array(&json, "data").unwrap_err();
        assert!(matches!(err, ParseError::MissingField(ref f) if f == "data"));
    }

    #[test]
    fn parse_object_rejects_invalid_syntax() {
        let err = parse_object("{not json").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn parse_object_rejects_top_level_array() {
        let err = parse_object("[1,2]").unwrap_err();
        assert!(matches!(err, ParseError::WrongType { found: "array", .. }));
    }
}
