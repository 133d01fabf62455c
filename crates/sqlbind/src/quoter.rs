//! Pluggable identifier-quoting policy.
//!
//! The quoting function is the single trust boundary between caller-supplied
//! identifiers and emitted SQL text. It is injected at builder construction
//! and applied per path segment; `*` and empty segments pass through as `*`.

use std::fmt;
use std::sync::Arc;

/// A per-segment identifier quoting function.
///
/// Cloning is cheap (`Arc`), so condition builders hold their own handle.
#[derive(Clone)]
pub struct Quoter(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Quoter {
    /// Build a quoter from a custom segment-quoting function.
    pub fn new(quote: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Quoter(Arc::new(quote))
    }

    /// Backtick quoting with embedded-backtick doubling (MySQL style).
    pub fn backtick() -> Self {
        Quoter::new(|s| format!("`{}`", s.replace('`', "``")))
    }

    /// Double-quote quoting with embedded-quote doubling (ANSI/PostgreSQL
    /// style).
    pub fn double_quote() -> Self {
        Quoter::new(|s| format!("\"{}\"", s.replace('"', "\"\"")))
    }

    /// Quote a single identifier segment.
    pub fn segment(&self, s: &str) -> String {
        (self.0)(s)
    }

    /// Quote a dotted identifier path, segment by segment.
    ///
    /// `*` and empty segments pass through unquoted as `*`, so `user.*`
    /// renders as `` `user`.* `` and a bare `*` stays `*`.
    pub fn path(&self, s: &str) -> String {
        s.split('.')
            .map(|seg| {
                if seg.is_empty() || seg == "*" {
                    "*".to_string()
                } else {
                    self.segment(seg)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl Default for Quoter {
    fn default() -> Self {
        Quoter::backtick()
    }
}

impl fmt::Debug for Quoter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Quoter").field(&"<dyn Fn>").finish()
    }
}
