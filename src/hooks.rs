use std::{fmt, rc::Rc};

use crate::{
    error::{Error, Result},
    value::Value,
};

/// Post-processing applied to a raw attribute value before it is inserted
/// (flat fields) or recursed into (nested and iterable fields).
///
/// The variant decides which arguments the hook receives.
///
/// ```
/// use dictfier::{Hook, Value};
///
/// let upper = Hook::value(|v| match v {
///     Value::String(s) => Value::String(s.to_uppercase()),
///     other => other,
/// });
/// let parent = Value::Null;
/// assert_eq!(upper.apply(Value::from("al"), &parent, "name"), Value::from("AL"));
/// ```
#[derive(Clone)]
pub enum Hook {
    /// `hook(value)`
    ValueOnly(Rc<dyn Fn(Value) -> Value>),

    /// `hook(value, parent)`
    WithParent(Rc<dyn Fn(Value, &Value) -> Value>),

    /// `hook(value, parent, field_name)`
    WithField(Rc<dyn Fn(Value, &Value, &str) -> Value>),
}

/// Arguments handed to a hook registered through [`Hook::with_arity`].
///
/// `parent` and `field` are only filled in when the declared arity asks for
/// them.
#[derive(Debug)]
pub struct HookArgs<'a> {
    pub value: Value,
    pub parent: Option<&'a Value>,
    pub field: Option<&'a str>,
}

impl Hook {
    pub fn value(f: impl Fn(Value) -> Value + 'static) -> Self {
        Hook::ValueOnly(Rc::new(f))
    }

    pub fn with_parent(f: impl Fn(Value, &Value) -> Value + 'static) -> Self {
        Hook::WithParent(Rc::new(f))
    }

    pub fn with_field(f: impl Fn(Value, &Value, &str) -> Value + 'static) -> Self {
        Hook::WithField(Rc::new(f))
    }

    /// Register a hook by its declared parameter count.
    ///
    /// # Errors
    ///
    /// [`Error::HookArity`] when `arity` is not 1, 2 or 3. The check happens
    /// here, before the hook can touch any value.
    pub fn with_arity(
        name: &str,
        arity: usize,
        f: impl Fn(HookArgs<'_>) -> Value + 'static,
    ) -> Result<Self> {
        let f = Rc::new(f);
        let hook = match arity {
            1 => Hook::value(move |value| {
                f(HookArgs {
                    value,
                    parent: None,
                    field: None,
                })
            }),
            2 => Hook::with_parent(move |value, parent| {
                f(HookArgs {
                    value,
                    parent: Some(parent),
                    field: None,
                })
            }),
            3 => Hook::with_field(move |value, parent, field| {
                f(HookArgs {
                    value,
                    parent: Some(parent),
                    field: Some(field),
                })
            }),
            _ => {
                return Err(Error::HookArity {
                    hook: name.to_string(),
                    arity,
                });
            }
        };
        Ok(hook)
    }

    pub fn arity(&self) -> usize {
        match self {
            Hook::ValueOnly(_) => 1,
            Hook::WithParent(_) => 2,
            Hook::WithField(_) => 3,
        }
    }

    pub fn apply(&self, value: Value, parent: &Value, field: &str) -> Value {
        match self {
            Hook::ValueOnly(f) => f(value),
            Hook::WithParent(f) => f(value, parent),
            Hook::WithField(f) => f(value, parent, field),
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook(arity = {})", self.arity())
    }
}

/// The three optional hooks of a [`Transformer`](crate::Transformer).
#[derive(Debug, Clone, Default)]
pub struct Hooks {
    /// Applied to flat field values
    pub flat: Option<Hook>,

    /// Applied to the object fetched for a nested flat field
    pub nested: Option<Hook>,

    /// Applied to the collection fetched for a nested iterable field
    pub iterable: Option<Hook>,
}
