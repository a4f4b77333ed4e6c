use std::{borrow::Cow, collections::HashMap, fmt, rc::Rc};

/// Attribute resolution for host objects.
///
/// Implement this for domain types that should be readable by a query. The
/// `Option` return keeps "attribute missing" apart from "attribute is null".
///
/// # Examples
///
/// ```
/// use dictfier::{Object, Value};
///
/// #[derive(Debug)]
/// struct Person {
///     name: String,
///     age: i64,
/// }
///
/// impl Object for Person {
///     fn type_name(&self) -> &str {
///         "Person"
///     }
///
///     fn get(&self, field: &str) -> Option<Value> {
///         match field {
///             "name" => Some(Value::from(self.name.as_str())),
///             "age" => Some(Value::Integer(self.age)),
///             _ => None,
///         }
///     }
/// }
///
/// let al = Value::object(Person { name: "Al".into(), age: 30 });
/// assert_eq!(al.get("age"), Some(Value::Integer(30)));
/// assert_eq!(al.get("email"), None);
/// ```
pub trait Object: fmt::Debug {
    /// Name used in error messages
    fn type_name(&self) -> &str {
        "object"
    }

    /// Look up a named attribute
    fn get(&self, field: &str) -> Option<Value>;

    /// Elements yielded when the object itself is iterated, if it is iterable
    fn elements(&self) -> Option<Vec<Value>> {
        None
    }
}

/// A zero-argument callable attribute, invoked when
/// [`Options::call_methods`](crate::Options) is enabled.
#[derive(Clone)]
pub struct Method(Rc<dyn Fn() -> Value>);

impl Method {
    pub fn new(f: impl Fn() -> Value + 'static) -> Self {
        Method(Rc::new(f))
    }

    pub fn call(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

/// A value flowing through a transformation, on either side of it.
///
/// Sources are usually [`Value::Object`] or [`Value::Map`]; results are built
/// from maps, arrays and the leaf values taken from the source.
#[derive(Debug, Clone)]
pub enum Value {
    Null,

    Boolean(bool),

    Integer(i64),

    Float(f64),

    String(String),

    Array(Vec<Value>),

    /// Dict-like mapping; its keys double as attributes when used as a source
    Map(HashMap<String, Value>),

    /// Host object resolved through the [`Object`] trait
    Object(Rc<dyn Object>),

    /// Callable attribute
    Method(Method),
}

impl Value {
    pub fn object(obj: impl Object + 'static) -> Self {
        Value::Object(Rc::new(obj))
    }

    pub fn method(f: impl Fn() -> Value + 'static) -> Self {
        Value::Method(Method::new(f))
    }

    /// Build a map from `(key, value)` pairs
    pub fn map<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Resolve a named attribute.
    ///
    /// Maps are looked up by key and objects through [`Object::get`]; no other
    /// value has attributes.
    pub fn get(&self, field: &str) -> Option<Value> {
        self.attr(field).map(Cow::into_owned)
    }

    /// Like [`get`](Self::get), but borrows map entries instead of cloning them
    pub fn attr(&self, field: &str) -> Option<Cow<'_, Value>> {
        match self {
            Value::Map(map) => map.get(field).map(Cow::Borrowed),
            Value::Object(obj) => obj.get(field).map(Cow::Owned),
            _ => None,
        }
    }

    /// Elements in iteration order, or `None` when the value is not iterable
    pub fn elements(&self) -> Option<Vec<Value>> {
        self.iter_elements().map(Cow::into_owned)
    }

    /// Like [`elements`](Self::elements), but borrows array items
    pub fn iter_elements(&self) -> Option<Cow<'_, [Value]>> {
        match self {
            Value::Array(items) => Some(Cow::Borrowed(items.as_slice())),
            Value::Object(obj) => obj.elements().map(Cow::Owned),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Object(obj) => obj.type_name(),
            Value::Method(_) => "method",
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Object(a), Object(b)) => Rc::ptr_eq(a, b),
            (Method(a), Method(b)) => Rc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                // Sorted for stable messages
                let mut keys: Vec<_> = map.keys().collect();
                keys.sort();
                f.write_str("{")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, map[key])?;
                }
                f.write_str("}")
            }
            Value::Object(obj) => write!(f, "<{}>", obj.type_name()),
            Value::Method(_) => f.write_str("<method>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
