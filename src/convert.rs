//! `serde_json::Value` <-> [`Value`] conversion

use crate::{
    error::{Error, Result},
    value::Value,
};

/// Convert a JSON document into a source value
pub fn from_json(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        // Only i64-overflowing numbers reach as_f64; it never fails without arbitrary_precision
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(from_json).collect()),
        serde_json::Value::Object(obj) => {
            Value::Map(obj.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}

/// Convert a value into JSON.
///
/// Non-finite floats become `null`. Map keys are sorted so the output is
/// deterministic.
///
/// # Errors
///
/// [`Error::NotSerializable`] for host objects and methods.
pub fn to_json(v: &Value) -> Result<serde_json::Value> {
    Ok(match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(to_json).collect::<Result<_>>()?)
        }
        Value::Map(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            let mut obj = serde_json::Map::with_capacity(map.len());
            for key in keys {
                obj.insert(key.clone(), to_json(&map[key])?);
            }
            serde_json::Value::Object(obj)
        }
        Value::Object(_) | Value::Method(_) => {
            return Err(Error::NotSerializable {
                type_name: v.type_name().to_string(),
            });
        }
    })
}
