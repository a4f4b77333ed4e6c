//! JSON rendering of transformation results.
//!
//! Output is deterministic: map keys are always sorted.
//!
//! ```
//! use dictfier::Value;
//! use dictfier::output::{to_json, to_json_pretty};
//!
//! let value = Value::map([("name", Value::from("Al")), ("age", Value::Integer(30))]);
//!
//! assert_eq!(to_json(&value).unwrap(), r#"{"age":30,"name":"Al"}"#);
//! assert_eq!(to_json_pretty(&value).unwrap(), "{\n  \"age\": 30,\n  \"name\": \"Al\"\n}");
//! ```

use crate::{convert, error::Result, value::Value};

/// Compact JSON with no extra whitespace
pub fn to_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&convert::to_json(value)?)?)
}

/// JSON with 2-space indentation
pub fn to_json_pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(&convert::to_json(value)?)?)
}
