//! Run a query against a JSON document

use tracing::debug;

use super::CliError;
use crate::{Missing, Options, Transformer, convert, parser};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query, in JSON notation
    pub query: String,
    /// JSON input string
    pub input: Option<String>,
    /// Only validate the query, don't execute
    pub syntax_only: bool,
    /// Lookup policies for the transformation
    pub options: Options,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Every level of the query has a valid shape
    SyntaxValid,
    /// Query executed successfully with JSON output
    Success(serde_json::Value),
}

/// Execute a dictfier check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let query = parser::parse_query(&options.query)?;

    if options.syntax_only {
        query.validate_deep()?;
        return Ok(CheckResult::SyntaxValid);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    let source = convert::from_json(json_value);

    debug!(query = %query, "executing check");
    let transformer = Transformer::new().with_options(options.options.clone());
    let result = transformer.transform(&source, &query)?;

    Ok(CheckResult::Success(convert::to_json(&result)?))
}

/// Map the `--missing` flag and optional `--default` literal onto a policy
pub fn missing_policy(null: bool, default: Option<&str>) -> Result<Missing, CliError> {
    match default {
        Some(text) => {
            let value: serde_json::Value = serde_json::from_str(text)?;
            Ok(Missing::Default(convert::from_json(value)))
        }
        None if null => Ok(Missing::Null),
        None => Ok(Missing::Fail),
    }
}
