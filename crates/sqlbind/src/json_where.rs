//! Declarative condition-tree compiler.
//!
//! Walks a [`Cond`] tree depth first and emits one SQL clause per leaf,
//! joining siblings with the active conjunction. Logical branching uses the
//! `$or`/`$and` keys, operators the `$`-tagged keys, and nested plain keys
//! compose dotted column paths.

use crate::cond::{Cond, CondValue};
use crate::error::{BuildError, BuildResult};
use crate::ops;
use crate::quoter::Quoter;
use crate::value::Value;

/// Compile a condition tree into `(sql, params)` joined by `conjunction`.
///
/// An empty tree compiles to an empty string with no params.
pub(crate) fn compile_tree(
    quoter: &Quoter,
    cond: &Cond,
    conjunction: &str,
) -> BuildResult<(String, Vec<Value>)> {
    let mut walker = Walker {
        quoter,
        sql: Vec::new(),
        params: Vec::new(),
        last_op: None,
    };
    for (key, value) in cond.iter() {
        walker.append_op(key, None, value)?;
    }
    Ok((walker.sql.join(&format!(" {conjunction} ")), walker.params))
}

/// Compile a single condition node: trees walk, raw fragments and computed
/// expressions pass straight through, anything else is vacuous.
pub(crate) fn compile_node(
    quoter: &Quoter,
    node: &CondValue,
    conjunction: &str,
) -> BuildResult<(String, Vec<Value>)> {
    match node {
        CondValue::Map(map) => compile_tree(quoter, map, conjunction),
        CondValue::Raw(r) => Ok((r.as_str().to_string(), Vec::new())),
        CondValue::Attr(a) => Ok(a.compile(quoter)),
        _ => Ok((String::new(), Vec::new())),
    }
}

struct Walker<'a> {
    quoter: &'a Quoter,
    sql: Vec<String>,
    params: Vec<Value>,
    // Operator tag of the most recent nested descent; `$quote`/`$raw` leaves
    // inherit it so `{ $gt: { $quote: "col" } }` keeps the `>`.
    last_op: Option<String>,
}

impl Walker<'_> {
    fn append_op(&mut self, key: &str, op: Option<&str>, value: &CondValue) -> BuildResult<()> {
        let mut key = key.to_string();
        let mut op = op.map(str::to_string);

        // `$xx` is an operator tag; a plain nested key extends the column
        // path instead.
        if let Some(tag) = op.take() {
            if let Some(stripped) = tag.strip_prefix('$') {
                op = Some(stripped.to_lowercase());
            } else {
                key = format!("{key}.{tag}");
            }
        }

        match op.as_deref() {
            Some(tag @ ("or" | "and")) => {
                // { age: { $or: { $lt: 10, $gt: 60 } } } branches on the same
                // field; rewrap every branch as its own single-field tree.
                let items: Vec<CondValue> = match value {
                    CondValue::Map(map) => map
                        .iter()
                        .map(|(op_key, v)| {
                            CondValue::from(
                                Cond::new()
                                    .entry(key.as_str(), Cond::new().entry(op_key, v.clone())),
                            )
                        })
                        .collect(),
                    CondValue::List(items) => items
                        .iter()
                        .map(|item| CondValue::from(Cond::new().entry(key.as_str(), item.clone())))
                        .collect(),
                    _ => Vec::new(),
                };
                let logical = format!("${tag}");
                return self.field_object(&logical, &CondValue::List(items));
            }
            Some("quote") => {
                let rendered = match value {
                    CondValue::Value(Value::Str(path)) => self.quoter.path(path),
                    CondValue::Raw(r) => r.as_str().to_string(),
                    CondValue::Attr(a) => {
                        let (sql, params) = a.compile(self.quoter);
                        self.params.extend(params);
                        sql
                    }
                    _ => return Err(BuildError::InvalidOperand(key)),
                };
                let op = self.last_op.clone();
                return self.push_clause(&key, op.as_deref(), &rendered);
            }
            Some("raw") => {
                let rendered = match value {
                    CondValue::Value(Value::Str(sql)) => sql.clone(),
                    CondValue::Raw(r) => r.as_str().to_string(),
                    _ => return Err(BuildError::InvalidOperand(key)),
                };
                let op = self.last_op.clone();
                return self.push_clause(&key, op.as_deref(), &rendered);
            }
            _ => {}
        }

        match value {
            // { ids: [1, 2, 3] } or { age: { $between: [18, 30] } }
            CondValue::List(items) if key != "$or" && key != "$and" => {
                if items.is_empty() {
                    return Err(BuildError::empty_values(key));
                }
                if matches!(op.as_deref(), Some("between" | "notbetween")) {
                    if items.len() != 2 {
                        return Err(BuildError::BetweenValues);
                    }
                    let start = self.holder(&key, &items[0])?;
                    let end = self.holder(&key, &items[1])?;
                    let rendered = format!("{start} AND {end}");
                    self.push_clause(&key, op.as_deref(), &rendered)
                } else {
                    let holders = items
                        .iter()
                        .map(|item| self.holder(&key, item))
                        .collect::<BuildResult<Vec<_>>>()?;
                    let rendered = format!("({})", holders.join(", "));
                    let tag = op.as_deref().unwrap_or("in");
                    self.push_clause(&key, Some(tag), &rendered)
                }
            }
            // { deleted_at: null }
            CondValue::Value(Value::Null) => {
                let tag = match op.as_deref() {
                    None | Some("eq") => "is",
                    Some("ne") => "isnot",
                    Some(other) => other,
                };
                self.push_clause(&key, Some(tag), "NULL")
            }
            // operator maps, nested field maps, `$or`/`$and` branch lists
            CondValue::Map(_) | CondValue::List(_) => {
                self.last_op = op;
                self.field_object(&key, value)
            }
            other => {
                let rendered = self.holder(&key, other)?;
                self.push_clause(&key, op.as_deref(), &rendered)
            }
        }
    }

    fn field_object(&mut self, key: &str, value: &CondValue) -> BuildResult<()> {
        if key == "$or" || key == "$and" {
            let con = key[1..].to_uppercase();
            match value {
                CondValue::List(items) if !items.is_empty() => {
                    let mut parts = Vec::new();
                    for item in items {
                        let (sql, params) = compile_node(self.quoter, item, "AND")?;
                        if sql.is_empty() {
                            continue;
                        }
                        parts.push(format!("({sql})"));
                        self.params.extend(params);
                    }
                    match parts.len() {
                        0 => {}
                        1 => self.sql.push(parts.remove(0)),
                        _ => self.sql.push(format!("({})", parts.join(&format!(" {con} ")))),
                    }
                    Ok(())
                }
                CondValue::Map(map) => {
                    let (sql, params) = compile_tree(self.quoter, map, &con)?;
                    if !sql.is_empty() {
                        self.sql.push(format!("({sql})"));
                        self.params.extend(params);
                    }
                    Ok(())
                }
                // vacuous branch list, e.g. `$or: []`
                _ => Ok(()),
            }
        } else {
            match value {
                CondValue::Map(map) => {
                    for (op_key, v) in map.iter() {
                        self.append_op(key, Some(op_key), v)?;
                    }
                    Ok(())
                }
                _ => Ok(()),
            }
        }
    }

    fn holder(&mut self, key: &str, value: &CondValue) -> BuildResult<String> {
        match value {
            CondValue::Raw(r) => Ok(r.as_str().to_string()),
            CondValue::Attr(a) => {
                let (sql, params) = a.compile(self.quoter);
                self.params.extend(params);
                Ok(sql)
            }
            CondValue::Value(v) => {
                self.params.push(v.clone());
                Ok("?".to_string())
            }
            CondValue::Map(_) | CondValue::List(_) => {
                Err(BuildError::InvalidOperand(key.to_string()))
            }
        }
    }

    fn push_clause(&mut self, key: &str, op: Option<&str>, rendered: &str) -> BuildResult<()> {
        let tag = op.unwrap_or("eq");
        let sql_op = ops::lookup(tag).ok_or_else(|| BuildError::unknown_operator(tag))?;
        self.sql
            .push(format!("{} {} {}", self.quoter.path(key), sql_op, rendered));
        Ok(())
    }
}
