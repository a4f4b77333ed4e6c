//! JSON notation for queries.
//!
//! ```text
//! ["name", {"address": ["city"]}, {"children": [["name"]]}, {"kind": {"$new": "person"}}]
//! ```
//!
//! - strings are flat fields
//! - objects are field mappings, keys kept in document order
//! - arrays are sub-queries; `[[...]]` marks an iterable
//! - `{"$new": <json>}` is a literal field ([`NewField`](crate::NewField))
//!
//! Computed fields have no JSON form. Shapes are not validated here; the
//! transformer checks every level as it reaches it, or call
//! [`Query::validate_deep`] up front.

use crate::{
    convert,
    error::{Error, Result},
    query::{Node, Query, Spec},
};

/// Key of the single-entry object that marks a literal field
pub const LITERAL_KEY: &str = "$new";

/// Parses a query from JSON text.
///
/// ```
/// use dictfier::parser::parse_query;
///
/// let query = parse_query(r#"["name", {"address": ["city"]}]"#).unwrap();
/// assert_eq!(query.len(), 2);
/// assert!(query.is_valid());
/// ```
pub fn parse_query(text: &str) -> Result<Query> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    query_from_json(&json)
}

/// Builds a query from an already parsed JSON document, which must be an array.
pub fn query_from_json(json: &serde_json::Value) -> Result<Query> {
    match json {
        serde_json::Value::Array(items) => items
            .iter()
            .map(node_from_json)
            .collect::<Result<Vec<_>>>()
            .map(Query::from_nodes),
        other => Err(Error::Format {
            node: other.to_string(),
        }),
    }
}

fn node_from_json(json: &serde_json::Value) -> Result<Node> {
    match json {
        serde_json::Value::String(name) => Ok(Node::Field(name.clone())),
        serde_json::Value::Array(_) => query_from_json(json).map(Node::Each),
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(name, value)| -> Result<(String, Spec)> {
                Ok((name.clone(), spec_from_json(name, value)?))
            })
            .collect::<Result<Vec<_>>>()
            .map(Node::Fields),
        other => Err(Error::Format {
            node: other.to_string(),
        }),
    }
}

fn spec_from_json(field: &str, json: &serde_json::Value) -> Result<Spec> {
    match json {
        serde_json::Value::Array(_) => query_from_json(json).map(Spec::SubQuery),
        serde_json::Value::Object(obj) if obj.len() == 1 => match obj.get(LITERAL_KEY) {
            Some(value) => Ok(Spec::Literal(convert::from_json(value.clone()))),
            None => Err(invalid_spec(field, json)),
        },
        other => Err(invalid_spec(field, other)),
    }
}

fn invalid_spec(field: &str, json: &serde_json::Value) -> Error {
    let found = match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        serde_json::Value::Number(_) => "float",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    };
    Error::InvalidSpec {
        field: field.to_string(),
        found: found.to_string(),
    }
}
