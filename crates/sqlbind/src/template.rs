//! Interpolation-template compilation.
//!
//! Implements the tagged-template calling convention: an alternating list of
//! literal SQL segments and argument slots. Arguments become `?` placeholders
//! (lists expand to `?,?,...`, raw fragments inline verbatim), while
//! `{ident.path}` markers found *inside* the literal segments resolve through
//! the quoting policy.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::quoter::Quoter;
use crate::raw::Raw;
use crate::value::{Value, impl_from_scalars};

static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([\w.]+)\}").expect("valid identifier-marker regex"));

/// One template argument slot.
#[derive(Debug, Clone)]
pub enum TplArg {
    /// Bound value: emits `?`.
    Value(Value),
    /// Raw fragment: inlined verbatim, no placeholder.
    Raw(Raw),
    /// List of bound values: expands to `?,?,...`.
    List(Vec<Value>),
}

impl_from_scalars!(TplArg, TplArg::Value);

impl From<Value> for TplArg {
    fn from(v: Value) -> Self {
        TplArg::Value(v)
    }
}

impl From<Raw> for TplArg {
    fn from(r: Raw) -> Self {
        TplArg::Raw(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for TplArg {
    fn from(vals: Vec<T>) -> Self {
        TplArg::List(vals.into_iter().map(Into::into).collect())
    }
}

/// Compile literal segments interleaved with arguments into `(sql, params)`.
///
/// `strings` is expected to have one more element than `args` (the tagged
/// template shape); shorter inputs are tolerated and simply stop early.
pub(crate) fn compile<S: AsRef<str>>(
    quoter: &Quoter,
    strings: &[S],
    args: &[TplArg],
) -> (String, Vec<Value>) {
    let mut sql = String::new();
    let mut params = Vec::new();

    if args.is_empty() {
        if let Some(first) = strings.first() {
            sql.push_str(first.as_ref());
        }
    } else {
        for (i, arg) in args.iter().enumerate() {
            if let Some(s) = strings.get(i) {
                sql.push_str(s.as_ref());
            }
            match arg {
                TplArg::Raw(r) => sql.push_str(r.as_str()),
                TplArg::List(vals) => {
                    sql.push_str(&vec!["?"; vals.len()].join(","));
                    params.extend(vals.iter().cloned());
                }
                TplArg::Value(v) => {
                    sql.push('?');
                    params.push(v.clone());
                }
            }
        }
        if let Some(last) = strings.get(args.len()) {
            sql.push_str(last.as_ref());
        }
    }

    let sql = QUOTE_RE
        .replace_all(&sql, |caps: &Captures<'_>| quoter.path(&caps[1]))
        .into_owned();
    (sql, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_only() {
        let q = Quoter::default();
        let (sql, params) = compile(&q, &["SELECT 1"], &[]);
        assert_eq!(sql, "SELECT 1");
        assert!(params.is_empty());
    }

    #[test]
    fn marker_and_bound_value() {
        let q = Quoter::default();
        let (sql, params) = compile(
            &q,
            &["SELECT * FROM {user} WHERE {age} > ", ""],
            &[TplArg::from(100)],
        );
        assert_eq!(sql, "SELECT * FROM `user` WHERE `age` > ?");
        assert_eq!(params, vec![Value::Int(100)]);
    }

    #[test]
    fn dotted_marker() {
        let q = Quoter::default();
        let (sql, _) = compile(&q, &["SELECT {u.id}"], &[]);
        assert_eq!(sql, "SELECT `u`.`id`");
    }

    #[test]
    fn raw_arg_inlines() {
        let q = Quoter::default();
        let (sql, params) = compile(
            &q,
            &["WHERE a = ", " AND b = ", ""],
            &[TplArg::from(Raw::new("NOW()")), TplArg::from(2)],
        );
        assert_eq!(sql, "WHERE a = NOW() AND b = ?");
        assert_eq!(params, vec![Value::Int(2)]);
    }

    #[test]
    fn list_arg_expands() {
        let q = Quoter::default();
        let (sql, params) = compile(
            &q,
            &["WHERE {id} IN (", ")"],
            &[TplArg::from(vec![1, 2, 3])],
        );
        assert_eq!(sql, "WHERE `id` IN (?,?,?)");
        assert_eq!(params.len(), 3);
    }
}
