use std::{fmt, rc::Rc};

use crate::{query::Query, value::Value};

/// Value side of a field mapping entry.
#[derive(Debug, Clone)]
pub enum Spec {
    /// Inserted verbatim, the source is never consulted
    Literal(Value),

    /// Derived from the parent object by a function
    Computed(UseObj),

    /// Empty (`[]`), iterable (`[[...]]`) or nested flat sub-query
    SubQuery(Query),
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Literal(value) => write!(f, "NewField({})", value),
            Spec::Computed(use_obj) => match &use_obj.query {
                Some(query) => write!(f, "UseObj(<fn>, {})", query),
                None => f.write_str("UseObj(<fn>)"),
            },
            Spec::SubQuery(query) => write!(f, "{}", query),
        }
    }
}

impl From<Query> for Spec {
    fn from(query: Query) -> Self {
        Spec::SubQuery(query)
    }
}

/// Literal field descriptor.
///
/// ```
/// use dictfier::{NewField, Query, Value};
///
/// let query = Query::new().literal("version", NewField::new(2));
/// let result = dictfier::dictfy(&Value::Null, &query).unwrap();
/// assert_eq!(result, Value::map([("version", Value::Integer(2))]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewField {
    pub value: Value,
}

impl NewField {
    pub fn new(value: impl Into<Value>) -> Self {
        NewField {
            value: value.into(),
        }
    }
}

impl From<NewField> for Spec {
    fn from(field: NewField) -> Self {
        Spec::Literal(field.value)
    }
}

/// Computed field descriptor.
///
/// `function` receives the parent source value. Without a query the derived
/// value is inserted as-is; with one it becomes the root of a fresh
/// transformation.
#[derive(Clone)]
pub struct UseObj {
    pub function: Rc<dyn Fn(&Value) -> Value>,
    pub query: Option<Query>,
}

impl UseObj {
    pub fn new(function: impl Fn(&Value) -> Value + 'static) -> Self {
        UseObj {
            function: Rc::new(function),
            query: None,
        }
    }

    pub fn with_query(function: impl Fn(&Value) -> Value + 'static, query: Query) -> Self {
        UseObj {
            function: Rc::new(function),
            query: Some(query),
        }
    }

    pub fn call(&self, parent: &Value) -> Value {
        (self.function)(parent)
    }
}

impl fmt::Debug for UseObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseObj")
            .field("function", &"<fn>")
            .field("query", &self.query)
            .finish()
    }
}

impl From<UseObj> for Spec {
    fn from(use_obj: UseObj) -> Self {
        Spec::Computed(use_obj)
    }
}
