//! Computed value expressions.
//!
//! An [`Attr`] describes a right-hand-side expression that is neither a plain
//! bound value nor a raw fragment: a function call, a quoted column
//! reference, an arithmetic operator chain, or an inline template. Attrs
//! compile against the active quoting policy at the moment a clause consumes
//! them, so the same expression renders correctly under any dialect.

use crate::quoter::Quoter;
use crate::raw::Raw;
use crate::template::{self, TplArg};
use crate::value::{Value, impl_from_scalars};

/// A value-position operand: bound scalar, raw fragment, or computed
/// expression.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Bound via `?` placeholder.
    Value(Value),
    /// Inlined verbatim.
    Raw(Raw),
    /// Compiled through the quoting policy.
    Attr(Attr),
}

impl_from_scalars!(Operand, Operand::Value);

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<Raw> for Operand {
    fn from(r: Raw) -> Self {
        Operand::Raw(r)
    }
}

impl From<Attr> for Operand {
    fn from(a: Attr) -> Self {
        Operand::Attr(a)
    }
}

/// A computed expression usable wherever a value is expected.
#[derive(Debug, Clone)]
pub enum Attr {
    /// SQL function call over an optional column argument.
    Fn {
        name: String,
        arg: Option<String>,
    },
    /// Operator chain, e.g. `` `count` + ? ``.
    Op(OpChain),
    /// Column reference, quoted at compile time.
    Quote(String),
    /// Inline template with its own argument slots.
    Template {
        strings: Vec<String>,
        args: Vec<TplArg>,
    },
}

impl Attr {
    /// Render the expression under the given quoting policy.
    pub fn compile(&self, quoter: &Quoter) -> (String, Vec<Value>) {
        match self {
            Attr::Fn { name, arg } => {
                let inner = arg.as_deref().map(|a| quoter.path(a)).unwrap_or_default();
                (format!("{name}({inner})"), Vec::new())
            }
            Attr::Op(chain) => chain.compile(quoter),
            Attr::Quote(path) => (quoter.path(path), Vec::new()),
            Attr::Template { strings, args } => template::compile(quoter, strings, args),
        }
    }
}

/// One element of an operator chain.
#[derive(Debug, Clone)]
enum OpItem {
    Text(String),
    Bind(Value),
    Nested(Box<Attr>),
}

/// A left-to-right chain of binary operators, e.g. `` `price` * ? + ? ``.
///
/// No precedence handling: parts render in insertion order, separated by
/// spaces. Pass another chain as the operand to get a parenthesized group.
#[derive(Debug, Clone)]
pub struct OpChain {
    items: Vec<OpItem>,
}

impl OpChain {
    /// Start a chain from an initial operand.
    pub fn new(prep: impl Into<Operand>) -> Self {
        let mut chain = OpChain { items: Vec::new() };
        chain.push_operand(prep.into());
        chain
    }

    /// Append `<op> <value>` to the chain.
    pub fn op(mut self, op: &str, value: impl Into<OpValue>) -> Self {
        self.items.push(OpItem::Text(op.to_string()));
        match value.into() {
            OpValue::Operand(operand) => self.push_operand(operand),
            OpValue::Chain(chain) => {
                self.items.push(OpItem::Text("(".to_string()));
                self.items.push(OpItem::Nested(Box::new(Attr::Op(chain))));
                self.items.push(OpItem::Text(")".to_string()));
            }
        }
        self
    }

    fn push_operand(&mut self, operand: Operand) {
        match operand {
            Operand::Value(v) => self.items.push(OpItem::Bind(v)),
            Operand::Raw(r) => self.items.push(OpItem::Text(r.into_string())),
            Operand::Attr(a) => self.items.push(OpItem::Nested(Box::new(a))),
        }
    }

    fn compile(&self, quoter: &Quoter) -> (String, Vec<Value>) {
        let mut parts = Vec::with_capacity(self.items.len());
        let mut params = Vec::new();
        for item in &self.items {
            match item {
                OpItem::Text(t) => parts.push(t.clone()),
                OpItem::Bind(v) => {
                    parts.push("?".to_string());
                    params.push(v.clone());
                }
                OpItem::Nested(a) => {
                    let (sql, inner) = a.compile(quoter);
                    parts.push(sql);
                    params.extend(inner);
                }
            }
        }
        (parts.join(" "), params)
    }
}

/// Right-hand side of [`OpChain::op`]: a plain operand or a nested chain.
#[derive(Debug, Clone)]
pub enum OpValue {
    Operand(Operand),
    Chain(OpChain),
}

fn op_value(v: Value) -> OpValue {
    OpValue::Operand(Operand::Value(v))
}

impl_from_scalars!(OpValue, op_value);

impl From<Value> for OpValue {
    fn from(v: Value) -> Self {
        op_value(v)
    }
}

impl From<Raw> for OpValue {
    fn from(r: Raw) -> Self {
        OpValue::Operand(Operand::Raw(r))
    }
}

impl From<Attr> for OpValue {
    fn from(a: Attr) -> Self {
        OpValue::Operand(Operand::Attr(a))
    }
}

impl From<Operand> for OpValue {
    fn from(o: Operand) -> Self {
        OpValue::Operand(o)
    }
}

impl From<OpChain> for OpValue {
    fn from(c: OpChain) -> Self {
        OpValue::Chain(c)
    }
}

/// Verbatim SQL fragment.
pub fn raw(sql: impl Into<String>) -> Raw {
    Raw::new(sql)
}

/// Quoted column reference, resolved against the active dialect.
pub fn quote(path: impl Into<String>) -> Attr {
    Attr::Quote(path.into())
}

/// Function call over a column path, e.g. `func("LOWER", "name")`.
pub fn func(name: impl Into<String>, arg: impl Into<String>) -> Attr {
    Attr::Fn {
        name: name.into(),
        arg: Some(arg.into()),
    }
}

/// `COUNT(column)`; an empty column counts `*`.
pub fn count(column: &str) -> Attr {
    let column = if column.is_empty() { "*" } else { column };
    func("COUNT", column)
}

/// `AVG(column)`.
pub fn avg(column: &str) -> Attr {
    func("AVG", column)
}

/// `SUM(column)`.
pub fn sum(column: &str) -> Attr {
    func("SUM", column)
}

/// `MIN(column)`.
pub fn min(column: &str) -> Attr {
    func("MIN", column)
}

/// `MAX(column)`.
pub fn max(column: &str) -> Attr {
    func("MAX", column)
}

/// Start an operator chain from an initial operand.
pub fn op(prep: impl Into<Operand>) -> OpChain {
    OpChain::new(prep)
}

/// Inline template expression; `{path}` markers in the literal segments quote
/// through the active dialect.
pub fn template(strings: &[&str], args: Vec<TplArg>) -> Attr {
    Attr::Template {
        strings: strings.iter().map(|s| s.to_string()).collect(),
        args,
    }
}

/// `column + by`, for in-place increments in UPDATE sets.
pub fn incr(column: &str, by: impl Into<OpValue>) -> Attr {
    Attr::Op(OpChain::new(quote(column)).op("+", by))
}

/// `column - by`, for in-place decrements in UPDATE sets.
pub fn decr(column: &str, by: impl Into<OpValue>) -> Attr {
    Attr::Op(OpChain::new(quote(column)).op("-", by))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q() -> Quoter {
        Quoter::default()
    }

    #[test]
    fn fn_attr_quotes_argument() {
        let (sql, params) = count("*").compile(&q());
        assert_eq!(sql, "COUNT(*)");
        assert!(params.is_empty());

        let (sql, _) = func("LOWER", "user.name").compile(&q());
        assert_eq!(sql, "LOWER(`user`.`name`)");
    }

    #[test]
    fn quote_attr() {
        let (sql, _) = quote("user.age").compile(&q());
        assert_eq!(sql, "`user`.`age`");
    }

    #[test]
    fn op_chain_binds_in_order() {
        let (sql, params) = incr("count", 1).compile(&q());
        assert_eq!(sql, "`count` + ?");
        assert_eq!(params, vec![Value::Int(1)]);

        let (sql, params) = Attr::Op(op(quote("price")).op("*", 3).op("-", 2)).compile(&q());
        assert_eq!(sql, "`price` * ? - ?");
        assert_eq!(params, vec![Value::Int(3), Value::Int(2)]);
    }

    #[test]
    fn nested_chain_is_parenthesized() {
        let chain = op(quote("a")).op("+", op(quote("b")).op("*", 2));
        let (sql, params) = Attr::Op(chain).compile(&q());
        assert_eq!(sql, "`a` + ( `b` * ? )");
        assert_eq!(params, vec![Value::Int(2)]);
    }

    #[test]
    fn raw_operand_passes_through() {
        let (sql, params) = Attr::Op(op(quote("ts")).op("+", raw("INTERVAL 1 DAY"))).compile(&q());
        assert_eq!(sql, "`ts` + INTERVAL 1 DAY");
        assert!(params.is_empty());
    }

    #[test]
    fn template_attr() {
        let attr = template(&["COALESCE({score}, ", ")"], vec![TplArg::from(0)]);
        let (sql, params) = attr.compile(&q());
        assert_eq!(sql, "COALESCE(`score`, ?)");
        assert_eq!(params, vec![Value::Int(0)]);
    }
}
