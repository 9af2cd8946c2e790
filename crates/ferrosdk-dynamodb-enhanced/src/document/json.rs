//! JSON projection of attribute values.
//!
//! Numbers keep their exact text in both directions; key order follows the
//! source. JSON has no set type, so sets become arrays and arrays always come
//! back as `L`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ferrosdk_dynamodb_model::{AttributeMap, AttributeValue};
use serde_json::{Map, Number, Value};

use crate::error::{DocumentError, DocumentResult};

/// Converts a JSON value into an attribute value. Never produces sets.
#[must_use]
pub fn from_json_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(from_json_value).collect()),
        Value::Object(map) => AttributeValue::M(from_json_object(map)),
    }
}

/// Converts a JSON object into an ordered attribute map.
#[must_use]
pub fn from_json_object(map: &Map<String, Value>) -> AttributeMap {
    map.iter()
        .map(|(k, v)| (k.clone(), from_json_value(v)))
        .collect()
}

/// Converts an attribute value into JSON.
#[must_use]
pub fn to_json_value(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_value(n),
        AttributeValue::B(b) => Value::String(STANDARD.encode(b)),
        AttributeValue::Ss(v) => Value::Array(v.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(v) => Value::Array(v.iter().map(|n| number_value(n)).collect()),
        AttributeValue::Bs(v) => Value::Array(
            v.iter()
                .map(|b| Value::String(STANDARD.encode(b)))
                .collect(),
        ),
        AttributeValue::L(items) => Value::Array(items.iter().map(to_json_value).collect()),
        AttributeValue::M(map) => Value::Object(to_json_object(map)),
    }
}

/// Converts an attribute map into a JSON object, keeping key order.
#[must_use]
pub fn to_json_object(map: &AttributeMap) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), to_json_value(v)))
        .collect()
}

/// Parses text that must hold a JSON object.
pub fn parse_object(text: &str) -> DocumentResult<AttributeMap> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(from_json_object(&map)),
        other => Err(DocumentError::InvalidJson(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

/// Parses any JSON text into a single attribute value.
pub fn parse_value(text: &str) -> DocumentResult<AttributeValue> {
    let value: Value = serde_json::from_str(text)?;
    Ok(from_json_value(&value))
}

fn number_value(text: &str) -> Value {
    // Text that is not a JSON number literal is kept as a string.
    serde_json::from_str::<Number>(text)
        .map_or_else(|_| Value::String(text.to_owned()), Value::Number)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
