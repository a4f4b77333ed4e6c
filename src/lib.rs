pub mod convert;
pub mod error;
pub mod hooks;
pub mod output;
pub mod parser;
pub mod query;
pub mod transformer;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
pub use hooks::{Hook, HookArgs, Hooks};
pub use output::{to_json, to_json_pretty};
pub use parser::parse_query;
pub use query::{NewField, Node, Query, Spec, UseObj};
pub use transformer::{Missing, Options, Transformer, dictfy};
pub use value::{Method, Object, Value};
