//! Error types for sqlbind.

use thiserror::Error;

/// Result type alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Usage errors raised while assembling a statement.
///
/// Every variant is a caller-construction mistake, raised synchronously by the
/// clause call that introduced the bad input. The library has no runtime
/// failure modes of its own (no network, no disk).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// Operator tag not present in the fixed operator table.
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// `between`/`notbetween` given other than exactly two values.
    #[error("between or notbetween must be 2 values")]
    BetweenValues,

    /// Empty array operand: ambiguous intent, rejected.
    #[error("parameter '{0}' cannot be empty")]
    EmptyValues(String),

    /// An operand of a shape the operator cannot consume (e.g. a nested tree
    /// where a scalar is required, or a non-string `$quote` target).
    #[error("invalid operand for '{0}'")]
    InvalidOperand(String),
}

impl BuildError {
    /// Create an unknown-operator error.
    pub fn unknown_operator(tag: impl Into<String>) -> Self {
        Self::UnknownOperator(tag.into())
    }

    /// Create an empty-values error for a field.
    pub fn empty_values(field: impl Into<String>) -> Self {
        Self::EmptyValues(field.into())
    }
}
