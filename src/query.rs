//! # Query language
//!
//! A [`Query`] describes which attributes of a source value to extract and how
//! to nest them. It is an ordered list of [`Node`]s:
//!
//! - **[`Node::Field`]** - copy one attribute (`"name"`)
//! - **[`Node::Fields`]** - a field mapping whose values are [`Spec`]s
//!   (`{"address": ["city"]}`)
//! - **[`Node::Each`]** - the source itself is iterable; transform every
//!   element against the inner query (`[["name"]]`)
//!
//! ## Shapes
//!
//! A query is valid in exactly two shapes:
//!
//! ```text
//! ["name", "age", {"address": ["city"]}]   // flat or nested: strings and mappings only
//! [["name", "age"]]                        // iterable: at most one node, a sequence
//! ```
//!
//! Mixing the two (`["a", ["b"]]`) is a [`Error::Format`]. Sub-queries are
//! checked independently at every level of the transformation.
//!
//! ## Mapping values
//!
//! | notation          | [`Spec`]                       | result                         |
//! |-------------------|--------------------------------|--------------------------------|
//! | `[]`              | `SubQuery` (empty)             | `{}` with no lookup            |
//! | `["city"]`        | `SubQuery` (nested)            | nested map                     |
//! | `[["name"]]`      | `SubQuery` (iterable marker)   | list of maps                   |
//! | `NewField(v)`     | `Literal`                      | `v` verbatim                   |
//! | `UseObj(f, q)`    | `Computed`                     | `f(parent)`, optionally queried |
//!
//! ## Building queries
//!
//! ```
//! use dictfier::{NewField, Query};
//!
//! let query = Query::new()
//!     .field("name")
//!     .nested("address", Query::new().field("city"))
//!     .iterable("children", Query::new().field("name"))
//!     .literal("kind", NewField::new("person"));
//!
//! assert!(query.is_valid());
//! assert_eq!(
//!     query.to_string(),
//!     r#"["name", {"address": ["city"]}, {"children": [["name"]]}, {"kind": NewField("person")}]"#
//! );
//! ```
pub mod node;
pub mod spec;

pub use node::Node;
pub use spec::{NewField, Spec, UseObj};

use std::fmt;

use crate::error::{Error, Result};

/// An ordered, read-only sequence of query nodes.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub nodes: Vec<Node>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Query { nodes }
    }

    /// Iterable query: transform every element of the source against `inner`
    pub fn each(inner: Query) -> Self {
        Query {
            nodes: vec![Node::Each(inner)],
        }
    }

    pub fn push(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Flat field
    pub fn field(self, name: impl Into<String>) -> Self {
        self.push(Node::Field(name.into()))
    }

    /// Several flat fields at once
    pub fn fields<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
        names.into_iter().fold(self, |query, name| query.field(name))
    }

    /// Single-entry field mapping
    pub fn spec(self, name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.push(Node::Fields(vec![(name.into(), spec.into())]))
    }

    /// Nested flat field: `{name: sub}`
    pub fn nested(self, name: impl Into<String>, sub: Query) -> Self {
        self.spec(name, Spec::SubQuery(sub))
    }

    /// Nested iterable field: `{name: [sub]}`
    pub fn iterable(self, name: impl Into<String>, sub: Query) -> Self {
        self.spec(name, Spec::SubQuery(Query::each(sub)))
    }

    /// Nested field known to be empty: `{name: []}`
    pub fn empty(self, name: impl Into<String>) -> Self {
        self.spec(name, Spec::SubQuery(Query::new()))
    }

    pub fn literal(self, name: impl Into<String>, field: NewField) -> Self {
        self.spec(name, field)
    }

    pub fn computed(self, name: impl Into<String>, field: UseObj) -> Self {
        self.spec(name, field)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The inner query when this query is a single iterable marker (`[[...]]`)
    pub fn iterable_marker(&self) -> Option<&Query> {
        match self.nodes.as_slice() {
            [Node::Each(inner)] => Some(inner),
            _ => None,
        }
    }

    /// Whether the query has one of the two accepted shapes
    pub fn is_valid(&self) -> bool {
        self.offending_node().is_none()
    }

    /// Check the shape of this query level.
    ///
    /// # Errors
    ///
    /// [`Error::Format`] naming the first node that breaks the shape chosen by
    /// the query.
    ///
    /// ```
    /// use dictfier::{Error, Query};
    ///
    /// let query = Query::new().field("a").push(dictfier::Node::Each(Query::new().field("b")));
    /// match query.validate() {
    ///     Err(Error::Format { node }) => assert_eq!(node, r#"["b"]"#),
    ///     other => panic!("unexpected {:?}", other),
    /// }
    /// ```
    pub fn validate(&self) -> Result<()> {
        match self.offending_node() {
            Some(node) => Err(Error::Format {
                node: node.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// [`validate`](Self::validate) this level and every sub-query below it,
    /// including the queries of computed fields.
    pub fn validate_deep(&self) -> Result<()> {
        self.validate()?;
        for node in &self.nodes {
            match node {
                Node::Field(_) => {}
                Node::Each(inner) => inner.validate_deep()?,
                Node::Fields(pairs) => {
                    for (_, spec) in pairs {
                        match spec {
                            Spec::SubQuery(query) => query.validate_deep()?,
                            Spec::Computed(UseObj {
                                query: Some(query), ..
                            }) => query.validate_deep()?,
                            Spec::Computed(_) | Spec::Literal(_) => {}
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn offending_node(&self) -> Option<&Node> {
        match self.nodes.first() {
            Some(Node::Each(_)) => self.nodes.get(1),
            _ => self.nodes.iter().find(|node| matches!(node, Node::Each(_))),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", node)?;
        }
        f.write_str("]")
    }
}

impl<S: Into<String>> FromIterator<S> for Query {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Query::new().fields(iter)
    }
}
