use std::{borrow::Cow, collections::HashMap};

use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    hooks::{Hook, Hooks},
    query::{Node, Query, Spec},
    value::Value,
};

/// What to do when a looked-up attribute does not exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Missing {
    /// Abort with [`Error::AttributeNotFound`]
    #[default]
    Fail,

    /// Insert `null` in place of the field
    Null,

    /// Insert the given literal in place of the field
    Default(Value),
}

/// Lookup policies of a [`Transformer`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Invoke [`Value::Method`] attributes with no arguments and use their result
    pub call_methods: bool,

    /// Policy for absent attributes
    pub missing: Missing,
}

/// The query-driven transformer.
///
/// Walks a [`Query`] in lock-step with a source [`Value`] and returns a new
/// container mirroring the query's shape: a map for flat/nested queries, a
/// list for iterable ones. The query is never modified, so one query can be
/// reused across any number of calls.
///
/// # Examples
///
/// ```
/// use dictfier::{Hook, Query, Transformer, Value};
///
/// let source = Value::map([
///     ("name", Value::from("Al")),
///     ("age", Value::Integer(30)),
/// ]);
/// let query = Query::new().fields(["name", "age"]);
///
/// let result = Transformer::new().transform(&source, &query).unwrap();
/// assert_eq!(result, source);
///
/// let doubled = Transformer::new()
///     .with_flat_hook(Hook::value(|v| match v {
///         Value::Integer(n) => Value::Integer(n * 2),
///         other => other,
///     }))
///     .transform(&source, &query)
///     .unwrap();
/// assert_eq!(doubled.get("age"), Some(Value::Integer(60)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    hooks: Hooks,
    options: Options,
}

/// Result of resolving one attribute.
enum Fetched<'a> {
    /// The attribute exists; hooks and recursion apply
    Found(Cow<'a, Value>),
    /// The attribute is absent and the missing policy supplied a stand-in
    Substituted(Value),
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn with_flat_hook(mut self, hook: Hook) -> Self {
        self.hooks.flat = Some(hook);
        self
    }

    pub fn with_nested_hook(mut self, hook: Hook) -> Self {
        self.hooks.nested = Some(hook);
        self
    }

    pub fn with_iterable_hook(mut self, hook: Hook) -> Self {
        self.hooks.iterable = Some(hook);
        self
    }

    pub fn call_methods(mut self, enabled: bool) -> Self {
        self.options.call_methods = enabled;
        self
    }

    pub fn on_missing(mut self, missing: Missing) -> Self {
        self.options.missing = missing;
        self
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Transforms `source` according to `query`.
    ///
    /// # Errors
    ///
    /// Any error from any level aborts the whole call:
    /// - [`Error::Format`] for a badly shaped query or sub-query
    /// - [`Error::AttributeNotFound`] under [`Missing::Fail`]
    /// - [`Error::NotIterable`] when an iterable query meets a scalar
    pub fn transform(&self, source: &Value, query: &Query) -> Result<Value> {
        query.validate()?;
        debug!(query = %query, source = source.type_name(), "transforming");

        match query.iterable_marker() {
            Some(inner) => self.transform_each(source, inner),
            None => self.transform_fields(source, query).map(Value::Map),
        }
    }

    fn transform_fields(&self, source: &Value, query: &Query) -> Result<HashMap<String, Value>> {
        let mut fields = HashMap::new();

        for node in &query.nodes {
            match node {
                Node::Field(name) => {
                    let value = self.flat_field(source, name)?;
                    fields.insert(name.clone(), value);
                }
                Node::Fields(pairs) => {
                    for (name, spec) in pairs {
                        let value = self.mapped_field(source, name, spec)?;
                        fields.insert(name.clone(), value);
                    }
                }
                // validate() only lets a sequence node through as the sole node
                Node::Each(_) => {
                    return Err(Error::Format {
                        node: node.to_string(),
                    });
                }
            }
        }

        Ok(fields)
    }

    fn flat_field(&self, source: &Value, name: &str) -> Result<Value> {
        trace!(field = name, "flat field");
        match self.fetch(source, name)? {
            Fetched::Found(value) => Ok(apply_hook(
                self.hooks.flat.as_ref(),
                value.into_owned(),
                source,
                name,
            )),
            Fetched::Substituted(value) => Ok(value),
        }
    }

    fn mapped_field(&self, source: &Value, name: &str, spec: &Spec) -> Result<Value> {
        match spec {
            Spec::Literal(value) => {
                trace!(field = name, "literal field");
                Ok(value.clone())
            }
            Spec::Computed(use_obj) => {
                trace!(field = name, "computed field");
                let derived = use_obj.call(source);
                match &use_obj.query {
                    Some(query) => self.transform(&derived, query),
                    None => Ok(derived),
                }
            }
            Spec::SubQuery(query) if query.is_empty() => {
                trace!(field = name, "empty nested field");
                Ok(Value::Map(HashMap::new()))
            }
            Spec::SubQuery(query) => match query.iterable_marker() {
                Some(inner) => {
                    trace!(field = name, "nested iterable field");
                    let collection = match self.fetch(source, name)? {
                        Fetched::Found(value) => {
                            hooked(self.hooks.iterable.as_ref(), value, source, name)
                        }
                        Fetched::Substituted(value) => return Ok(value),
                    };
                    self.transform_each(&collection, inner)
                }
                None => {
                    trace!(field = name, "nested flat field");
                    let object = match self.fetch(source, name)? {
                        Fetched::Found(value) => {
                            hooked(self.hooks.nested.as_ref(), value, source, name)
                        }
                        Fetched::Substituted(value) => return Ok(value),
                    };
                    self.transform(&object, query)
                }
            },
        }
    }

    /// Transforms every element of `source` against `inner`, in source order.
    fn transform_each(&self, source: &Value, inner: &Query) -> Result<Value> {
        let elements = source.iter_elements().ok_or_else(|| Error::NotIterable {
            type_name: source.type_name().to_string(),
        })?;
        trace!(count = elements.len(), "iterating");

        elements
            .iter()
            .map(|element| self.transform(element, inner))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn fetch<'a>(&self, source: &'a Value, name: &str) -> Result<Fetched<'a>> {
        match source.attr(name) {
            Some(value) => {
                if self.options.call_methods {
                    if let Value::Method(method) = value.as_ref() {
                        return Ok(Fetched::Found(Cow::Owned(method.call())));
                    }
                }
                Ok(Fetched::Found(value))
            }
            None => match &self.options.missing {
                Missing::Fail => Err(Error::AttributeNotFound {
                    field: name.to_string(),
                    type_name: source.type_name().to_string(),
                }),
                Missing::Null => {
                    debug!(field = name, "attribute missing, inserting null");
                    Ok(Fetched::Substituted(Value::Null))
                }
                Missing::Default(value) => {
                    debug!(field = name, "attribute missing, inserting default");
                    Ok(Fetched::Substituted(value.clone()))
                }
            },
        }
    }
}

fn apply_hook(hook: Option<&Hook>, value: Value, parent: &Value, field: &str) -> Value {
    match hook {
        Some(hook) => hook.apply(value, parent, field),
        None => value,
    }
}

/// Applies `hook` to a fetched sub-object, borrowing it untouched when no hook is set
fn hooked<'a>(
    hook: Option<&Hook>,
    value: Cow<'a, Value>,
    parent: &Value,
    field: &str,
) -> Cow<'a, Value> {
    match hook {
        Some(hook) => Cow::Owned(hook.apply(value.into_owned(), parent, field)),
        None => value,
    }
}

/// Transforms `source` with no hooks and the default options.
///
/// ```
/// use dictfier::{Query, Value, dictfy};
///
/// let source = Value::map([("address", Value::map([("city", Value::from("X"))]))]);
/// let query = Query::new().nested("address", Query::new().field("city"));
///
/// let result = dictfy(&source, &query).unwrap();
/// assert_eq!(result, source);
/// ```
pub fn dictfy(source: &Value, query: &Query) -> Result<Value> {
    Transformer::new().transform(source, query)
}
