use serde_json::Value;

/// True for null, the empty string, an empty sequence and an empty mapping.
///
/// Linting, redaction and projection treat these as "not present".
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// True for null, the empty string and an empty sequence.
///
/// Candidate lookup skips blank values; unlike [`is_empty`], an empty
/// mapping is not blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Recursively drop mapping entries whose value is null.
///
/// Sequence elements are kept in place (only their contents are cleaned),
/// so positions stay stable.
pub fn denull(record: Value) -> Value {
    match record {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, denull(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(denull).collect()),
        other => other,
    }
}
