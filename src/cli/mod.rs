//! CLI support for dictfier
//!
//! Provides programmatic access to the `dictfier` command so other tools can
//! embed it.

mod check;

pub use check::{CheckOptions, CheckResult, execute_check, missing_policy};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Invalid query or failed transformation
    #[error("Transform error: {0}")]
    Transform(#[from] crate::Error),

    /// Input document is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
