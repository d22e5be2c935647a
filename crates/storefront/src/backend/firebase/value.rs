//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! Firestore REST wraps every value in a single-key object naming its type:
//! `{"stringValue": "x"}`, `{"integerValue": "42"}`, `{"mapValue": {"fields":
//! {...}}}`. Integers travel as decimal strings.

use serde_json::{Number, Value, json};

use crate::backend::{BackendError, Fields};

/// Encode a field map as a Firestore `fields` object.
#[must_use]
pub fn encode_fields(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), encode_value(value)))
            .collect(),
    )
}

/// Encode one JSON value.
#[must_use]
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or_default() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({
            "mapValue": { "fields": encode_fields(map) }
        }),
    }
}

/// Decode a Firestore `fields` object. A missing object decodes as empty.
///
/// # Errors
///
/// Returns [`BackendError::Decode`] for malformed typed values.
pub fn decode_fields(fields: Option<&Value>) -> Result<Fields, BackendError> {
    let Some(fields) = fields else {
        return Ok(Fields::new());
    };
    let Value::Object(map) = fields else {
        return Err(BackendError::Decode("fields is not an object".to_string()));
    };
    map.iter()
        .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
        .collect()
}

/// Decode one typed value.
///
/// # Errors
///
/// Returns [`BackendError::Decode`] when the value is not a single-key
/// typed object or its payload does not match the type.
pub fn decode_value(value: &Value) -> Result<Value, BackendError> {
    let Value::Object(typed) = value else {
        return Err(malformed(value));
    };
    let Some((kind, payload)) = typed.iter().next() else {
        return Err(malformed(value));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => payload.as_bool().map(Value::Bool).ok_or_else(|| malformed(value)),
        "integerValue" => decode_integer(payload).ok_or_else(|| malformed(value)),
        "doubleValue" => Ok(decode_double(payload)),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => payload
            .as_str()
            .map(|s| Value::String(s.to_owned()))
            .ok_or_else(|| malformed(value)),
        "geoPointValue" => Ok(payload.clone()),
        "arrayValue" => {
            let items = payload
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(items))
        }
        "mapValue" => Ok(Value::Object(decode_fields(payload.get("fields"))?)),
        _ => Err(malformed(value)),
    }
}

fn decode_integer(payload: &Value) -> Option<Value> {
    match payload {
        Value::String(s) => s.parse::<i64>().ok().map(|i| Value::Number(i.into())),
        Value::Number(n) => Some(Value::Number(n.clone())),
        _ => None,
    }
}

/// Non-finite doubles have no JSON form and decode as null.
fn decode_double(payload: &Value) -> Value {
    let float = match payload {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    float
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

fn malformed(value: &Value) -> BackendError {
    let mut text = value.to_string();
    if text.len() > 120 {
        text = text.chars().take(120).collect();
    }
    BackendError::Decode(format!("malformed Firestore value: {text}"))
}
