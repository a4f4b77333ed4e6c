use std::fmt;

use crate::query::{Query, Spec};

/// A single element of a [`Query`].
#[derive(Debug, Clone)]
pub enum Node {
    /// Flat field: the attribute of that name, passed through the flat hook
    Field(String),

    /// Field mapping, in declaration order
    Fields(Vec<(String, Spec)>),

    /// Sequence node: the source is iterated and each element is transformed
    /// against the inner query
    Each(Query),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Field(name) => write!(f, "{:?}", name),
            Node::Fields(pairs) => {
                f.write_str("{")?;
                for (i, (name, spec)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", name, spec)?;
                }
                f.write_str("}")
            }
            Node::Each(inner) => write!(f, "{}", inner),
        }
    }
}

impl From<&str> for Node {
    fn from(name: &str) -> Self {
        Node::Field(name.to_string())
    }
}
