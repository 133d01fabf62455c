//! Declarative condition trees.
//!
//! A [`Cond`] is an insertion-ordered map of field paths (or `$`-tagged
//! logical keys) to condition values. Trees are usually produced from
//! `serde_json::Value` via [`From`], so callers can hand the compiler a
//! `json!({...})` literal directly; order is preserved end to end so emitted
//! SQL is deterministic.

use indexmap::IndexMap;

use crate::attr::Attr;
use crate::raw::Raw;
use crate::value::{Value, impl_from_scalars};

/// An ordered condition tree: field or logical key to condition value.
#[derive(Debug, Clone, Default)]
pub struct Cond(pub(crate) IndexMap<String, CondValue>);

impl Cond {
    /// Empty tree; compiles to no SQL at all.
    pub fn new() -> Self {
        Cond::default()
    }

    /// Insert an entry, builder style.
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<CondValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// True when the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CondValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One node of a condition tree.
#[derive(Debug, Clone)]
pub enum CondValue {
    /// Scalar operand (or NULL).
    Value(Value),
    /// Array operand: IN lists, BETWEEN pairs, or `$or`/`$and` branch lists.
    List(Vec<CondValue>),
    /// Nested tree: operator maps or grouped sub-conditions.
    Map(Cond),
    /// Verbatim fragment operand.
    Raw(Raw),
    /// Computed expression operand.
    Attr(Attr),
}

impl_from_scalars!(CondValue, CondValue::Value);

impl From<Value> for CondValue {
    fn from(v: Value) -> Self {
        CondValue::Value(v)
    }
}

impl From<Raw> for CondValue {
    fn from(r: Raw) -> Self {
        CondValue::Raw(r)
    }
}

impl From<Attr> for CondValue {
    fn from(a: Attr) -> Self {
        CondValue::Attr(a)
    }
}

impl From<Cond> for CondValue {
    fn from(c: Cond) -> Self {
        CondValue::Map(c)
    }
}

impl<T: Into<CondValue>> From<Vec<T>> for CondValue {
    fn from(items: Vec<T>) -> Self {
        CondValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for CondValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => CondValue::Value(Value::Null),
            serde_json::Value::Bool(b) => CondValue::Value(Value::Bool(b)),
            serde_json::Value::Number(n) => {
                let value = if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                };
                CondValue::Value(value)
            }
            serde_json::Value::String(s) => CondValue::Value(Value::Str(s)),
            serde_json::Value::Array(items) => {
                CondValue::List(items.into_iter().map(CondValue::from).collect())
            }
            serde_json::Value::Object(map) => CondValue::Map(Cond::from(map)),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Cond {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Cond(
            map.into_iter()
                .map(|(k, v)| (k, CondValue::from(v)))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for Cond {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Object(map) => Cond::from(map),
            _ => Cond::new(),
        }
    }
}
