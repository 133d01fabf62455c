//! Verbatim SQL fragments.

use std::fmt;

/// Caller-trusted literal SQL text, emitted without quoting or
/// parameterization.
///
/// `Raw` is the explicit escape hatch of the library: wherever a value or
/// field reference is expected, a `Raw` passes through untouched. The caller
/// owns the injection risk inside the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw(String);

impl Raw {
    /// Wrap a pre-formatted SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Raw(sql.into())
    }

    /// Borrow the fragment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the fragment text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Raw {
    fn from(s: &str) -> Self {
        Raw::new(s)
    }
}

impl From<String> for Raw {
    fn from(s: String) -> Self {
        Raw::new(s)
    }
}
