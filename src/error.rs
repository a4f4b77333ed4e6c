/// Errors raised while validating a query or transforming a source value.
///
/// Every failure aborts the whole transformation; nothing is retried and no
/// partial result is returned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The query (or one of its sub-queries) is neither a flat/nested query
    /// nor a single iterable marker.
    #[error("Invalid query format on \"{node}\" node")]
    Format { node: String },

    /// A field mapping value is not a literal, a computed field or a sub-query.
    #[error("'{field}' value must be a NewField, UseObj or sub-query, not '{found}'")]
    InvalidSpec { field: String, found: String },

    /// A hook was registered with an unsupported number of parameters.
    #[error("{hook}() takes at most 3 arguments ({arity} given)")]
    HookArity { hook: String, arity: usize },

    /// The source value has no attribute with the requested name.
    #[error("'{type_name}' object has no attribute '{field}'")]
    AttributeNotFound { field: String, type_name: String },

    /// An iterable query was applied to a value that cannot be iterated.
    #[error("'{type_name}' object is not iterable")]
    NotIterable { type_name: String },

    /// The value holds a host object or method that has no JSON form.
    #[error("'{type_name}' value cannot be rendered as JSON")]
    NotSerializable { type_name: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
