//! SQL statement assembly.
//!
//! [`Builder`] is an ordered token list plus a bound-parameter list. Clause
//! methods append in call order with no reordering and no validation of
//! statement shape; `build` joins the tokens with single spaces. All clause
//! methods route caller identifiers through the configured [`Quoter`], so the
//! only unquoted text in the output is what arrived wrapped in [`Raw`].

use tracing::debug;

use crate::attr::{Attr, Operand};
use crate::cond::Cond;
use crate::error::BuildResult;
use crate::json_where;
use crate::quoter::Quoter;
use crate::raw::Raw;
use crate::template::{self, TplArg};
use crate::value::Value;
use crate::where_clause::Where;

/// A field-position reference: plain dotted name, raw fragment, or computed
/// expression.
#[derive(Debug, Clone)]
pub enum Field {
    Name(String),
    Raw(Raw),
    Attr(Attr),
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Name(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Name(s)
    }
}

impl From<Raw> for Field {
    fn from(r: Raw) -> Self {
        Field::Raw(r)
    }
}

impl From<Attr> for Field {
    fn from(a: Attr) -> Self {
        Field::Attr(a)
    }
}

/// One projection entry of a SELECT list.
#[derive(Debug, Clone)]
pub enum SelectItem {
    /// Bare field, quoted as a dotted path.
    Field(Field),
    /// `from AS to`.
    Alias { from: Field, to: String },
    /// Table-scoped column list: `table.col, table.col, ...`.
    Scope { table: String, columns: Vec<String> },
    /// Table-scoped aliased columns: `table.col AS alias, ...`.
    Scoped {
        table: String,
        columns: Vec<(String, String)>,
    },
    /// Aliased sub-statement: the query's sql verbatim, `AS alias`.
    Subquery { alias: String, query: Builder },
}

impl SelectItem {
    /// `from AS to`.
    pub fn alias(from: impl Into<Field>, to: impl Into<String>) -> Self {
        SelectItem::Alias {
            from: from.into(),
            to: to.into(),
        }
    }

    /// All named columns under one table prefix.
    pub fn scope(
        table: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        SelectItem::Scope {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// `(column, alias)` pairs under one table prefix.
    pub fn scoped(
        table: impl Into<String>,
        columns: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        SelectItem::Scoped {
            table: table.into(),
            columns: columns
                .into_iter()
                .map(|(c, a)| (c.into(), a.into()))
                .collect(),
        }
    }

    /// A built sub-statement projected under an alias.
    pub fn subquery(alias: impl Into<String>, query: Builder) -> Self {
        SelectItem::Subquery {
            alias: alias.into(),
            query,
        }
    }
}

impl From<Field> for SelectItem {
    fn from(f: Field) -> Self {
        SelectItem::Field(f)
    }
}

impl From<&str> for SelectItem {
    fn from(s: &str) -> Self {
        SelectItem::Field(Field::from(s))
    }
}

impl From<String> for SelectItem {
    fn from(s: String) -> Self {
        SelectItem::Field(Field::from(s))
    }
}

impl From<Raw> for SelectItem {
    fn from(r: Raw) -> Self {
        SelectItem::Field(Field::from(r))
    }
}

impl From<Attr> for SelectItem {
    fn from(a: Attr) -> Self {
        SelectItem::Field(Field::from(a))
    }
}

/// Target table list for UPDATE; single tables convert implicitly.
#[derive(Debug, Clone)]
pub struct Tables(Vec<Field>);

impl From<&str> for Tables {
    fn from(s: &str) -> Self {
        Tables(vec![Field::from(s)])
    }
}

impl From<String> for Tables {
    fn from(s: String) -> Self {
        Tables(vec![Field::from(s)])
    }
}

impl From<Field> for Tables {
    fn from(f: Field) -> Self {
        Tables(vec![f])
    }
}

impl<T: Into<Field>> From<Vec<T>> for Tables {
    fn from(fields: Vec<T>) -> Self {
        Tables(fields.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Field>, const N: usize> From<[T; N]> for Tables {
    fn from(fields: [T; N]) -> Self {
        Tables(fields.into_iter().map(Into::into).collect())
    }
}

/// Condition argument accepted by WHERE, HAVING, and JOIN ... ON.
#[derive(Debug, Clone, Default)]
pub enum CondArg {
    /// No condition; compiles to nothing.
    #[default]
    None,
    /// Declarative tree.
    Tree(Cond),
    /// Pre-built fluent chain.
    Fluent(Where),
}

impl CondArg {
    fn compile(&self, quoter: &Quoter) -> BuildResult<(String, Vec<Value>)> {
        match self {
            CondArg::None => Ok((String::new(), Vec::new())),
            CondArg::Tree(cond) => json_where::compile_tree(quoter, cond, "AND"),
            CondArg::Fluent(w) => Ok(w.build()),
        }
    }
}

impl From<()> for CondArg {
    fn from(_: ()) -> Self {
        CondArg::None
    }
}

impl From<Cond> for CondArg {
    fn from(c: Cond) -> Self {
        CondArg::Tree(c)
    }
}

impl From<Where> for CondArg {
    fn from(w: Where) -> Self {
        CondArg::Fluent(w)
    }
}

impl From<serde_json::Value> for CondArg {
    fn from(v: serde_json::Value) -> Self {
        CondArg::Tree(Cond::from(v))
    }
}

/// Ordered SQL token list with positionally bound parameters.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    quoter: Quoter,
    sql: Vec<String>,
    params: Vec<Value>,
    one: bool,
    nest_tables: bool,
}

impl Builder {
    /// Empty statement with backtick quoting.
    pub fn new() -> Self {
        Builder::default()
    }

    /// Empty statement with the given quoting policy.
    pub fn with_quoter(quoter: Quoter) -> Self {
        Builder {
            quoter,
            ..Builder::default()
        }
    }

    /// The active quoting policy.
    pub fn quoter(&self) -> &Quoter {
        &self.quoter
    }

    /// Wrap a pre-formatted fragment; shorthand for [`Raw::new`].
    pub fn raw(&self, sql: impl Into<String>) -> Raw {
        Raw::new(sql)
    }

    /// Fresh fluent chain seeded with this statement's quoting policy, for
    /// building a condition out of line and passing it to
    /// [`Builder::where_with`], [`Builder::having`], or a join.
    pub fn new_where(&self) -> Where {
        Where::new(self.quoter.clone(), "AND")
    }

    /// Quote a field reference into a [`Raw`] fragment. Raw fields pass
    /// through, computed expressions compile here and merge their parameters
    /// into this statement.
    pub fn quote(&mut self, field: impl Into<Field>) -> Raw {
        match field.into() {
            Field::Raw(r) => r,
            Field::Attr(a) => {
                let (sql, params) = a.compile(&self.quoter);
                self.params.extend(params);
                Raw::new(sql)
            }
            Field::Name(name) => Raw::new(self.quoter.path(&name)),
        }
    }

    /// Shorthand for [`Builder::quote`].
    pub fn q(&mut self, field: impl Into<Field>) -> Raw {
        self.quote(field)
    }

    /// `from AS to`, both sides quoted.
    pub fn as_(&mut self, from: impl Into<Field>, to: impl Into<Field>) -> Raw {
        let from = self.quote(from);
        let to = self.quote(to);
        Raw::new(format!("{from} AS {to}"))
    }

    /// Append a raw SQL token.
    pub fn append(&mut self, sql: impl Into<String>) -> &mut Self {
        self.sql.push(sql.into());
        self
    }

    /// Append a raw SQL token together with its bound parameters.
    pub fn append_params(&mut self, sql: impl Into<String>, params: Vec<Value>) -> &mut Self {
        self.sql.push(sql.into());
        self.params.extend(params);
        self
    }

    /// Append another statement's sql and parameters in place.
    pub fn append_builder(&mut self, other: &Builder) -> &mut Self {
        let (sql, params) = other.build();
        self.append_params(sql, params)
    }

    /// Append a lone `?` placeholder bound to `value`.
    pub fn param(&mut self, value: impl Into<Value>) -> &mut Self {
        self.sql.push("?".to_string());
        self.params.push(value.into());
        self
    }

    /// Append an interpolation template: literal segments with `{path}`
    /// quoting markers, interleaved with bound argument slots.
    pub fn sql_template(&mut self, strings: &[&str], args: Vec<TplArg>) -> &mut Self {
        let (sql, params) = template::compile(&self.quoter, strings, &args);
        self.append_params(sql, params)
    }

    /// Append a comma-joined projection list as a single token.
    pub fn fields<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<SelectItem>,
    {
        let mut rendered: Vec<String> = Vec::new();
        for item in items {
            match item.into() {
                SelectItem::Field(f) => {
                    let r = self.quote(f);
                    if !r.as_str().is_empty() {
                        rendered.push(r.into_string());
                    }
                }
                SelectItem::Alias { from, to } => {
                    let r = self.as_(from, to.as_str());
                    rendered.push(r.into_string());
                }
                SelectItem::Scope { table, columns } => {
                    for column in columns {
                        rendered.push(self.quoter.path(&format!("{table}.{column}")));
                    }
                }
                SelectItem::Scoped { table, columns } => {
                    for (column, alias) in columns {
                        let r = self.as_(format!("{table}.{column}"), alias.as_str());
                        rendered.push(r.into_string());
                    }
                }
                SelectItem::Subquery { alias, query } => {
                    let (sql, params) = query.build();
                    if !sql.is_empty() {
                        self.params.extend(params);
                        let r = self.as_(Raw::new(sql), alias.as_str());
                        rendered.push(r.into_string());
                    }
                }
            }
        }
        if !rendered.is_empty() {
            self.append(rendered.join(", "));
        }
        self
    }

    /// `SELECT <fields>`; an empty list projects `*`.
    pub fn select<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<SelectItem>,
    {
        self.append("SELECT");
        let items: Vec<SelectItem> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            self.fields(["*"])
        } else {
            self.fields(items)
        }
    }

    /// `SELECT *`.
    pub fn select_all(&mut self) -> &mut Self {
        self.select(Vec::<SelectItem>::new())
    }

    /// `UPDATE <tables> SET col = val, ...` in map enumeration order.
    pub fn update<K, V, I>(&mut self, tables: impl Into<Tables>, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        self.append("UPDATE");
        let names: Vec<String> = tables
            .into()
            .0
            .into_iter()
            .map(|f| self.quote(f).into_string())
            .collect();
        self.append(names.join(", "));
        self.append("SET");
        let mut sets = Vec::new();
        for (column, value) in columns {
            let column = column.into();
            let rendered = self.operand_holder(value.into());
            sets.push(format!("{} = {}", self.quoter.path(&column), rendered));
        }
        self.append(sets.join(", "))
    }

    /// `INSERT INTO <table> (col, ...) VALUES (?, ...)` in map enumeration
    /// order.
    pub fn insert<K, V, I>(&mut self, table: impl Into<Field>, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        self.append("INSERT INTO");
        let table = self.quote(table).into_string();
        self.append(table);
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        for (column, value) in columns {
            let column = column.into();
            cols.push(self.quoter.path(&column));
            vals.push(self.operand_holder(value.into()));
        }
        self.append(format!(
            "({}) VALUES ({})",
            cols.join(", "),
            vals.join(", ")
        ))
    }

    /// `DELETE FROM <table>`.
    pub fn delete(&mut self, table: impl Into<Field>) -> &mut Self {
        self.append("DELETE FROM");
        let table = self.quote(table).into_string();
        self.append(table)
    }

    fn operand_holder(&mut self, value: Operand) -> String {
        match value {
            Operand::Raw(r) => r.into_string(),
            Operand::Attr(a) => {
                let (sql, params) = a.compile(&self.quoter);
                self.params.extend(params);
                sql
            }
            Operand::Value(v) => {
                self.params.push(v);
                "?".to_string()
            }
        }
    }

    /// `FROM <name>` or `FROM <name> AS <alias>`.
    pub fn from(&mut self, name: impl Into<Field>, alias: Option<&str>) -> &mut Self {
        self.append("FROM");
        let rendered = match alias {
            Some(a) => self.as_(name, a),
            None => self.quote(name),
        };
        let rendered = rendered.into_string();
        self.append(rendered)
    }

    fn push_join(
        &mut self,
        kind: &str,
        table: Field,
        alias: Option<&str>,
        on: (String, Vec<Value>),
    ) -> &mut Self {
        self.append(format!("{kind} JOIN"));
        let rendered = match alias {
            Some(a) => self.as_(table, a),
            None => self.quote(table),
        };
        let rendered = rendered.into_string();
        self.append(rendered);
        let (sql, params) = on;
        if !sql.is_empty() {
            self.append(format!("ON ({sql})"));
            self.params.extend(params);
        }
        self
    }

    /// `<KIND> JOIN <table> [AS <alias>] [ON (<condition>)]`. An empty
    /// compiled condition omits the ON segment entirely.
    pub fn join_as(
        &mut self,
        table: impl Into<Field>,
        alias: Option<&str>,
        on: impl Into<CondArg>,
        kind: &str,
    ) -> BuildResult<&mut Self> {
        let on = on.into().compile(&self.quoter)?;
        Ok(self.push_join(kind, table.into(), alias, on))
    }

    /// `INNER JOIN`.
    pub fn join(
        &mut self,
        table: impl Into<Field>,
        alias: Option<&str>,
        on: impl Into<CondArg>,
    ) -> BuildResult<&mut Self> {
        self.join_as(table, alias, on, "INNER")
    }

    /// `LEFT JOIN`.
    pub fn left_join(
        &mut self,
        table: impl Into<Field>,
        alias: Option<&str>,
        on: impl Into<CondArg>,
    ) -> BuildResult<&mut Self> {
        self.join_as(table, alias, on, "LEFT")
    }

    /// `RIGHT JOIN`.
    pub fn right_join(
        &mut self,
        table: impl Into<Field>,
        alias: Option<&str>,
        on: impl Into<CondArg>,
    ) -> BuildResult<&mut Self> {
        self.join_as(table, alias, on, "RIGHT")
    }

    fn fluent(&self, f: impl FnOnce(&mut Where)) -> (String, Vec<Value>) {
        let mut w = Where::new(self.quoter.clone(), "AND");
        f(&mut w);
        w.build()
    }

    /// JOIN with the ON condition built fluently. Never fails.
    pub fn join_fn(
        &mut self,
        table: impl Into<Field>,
        alias: Option<&str>,
        f: impl FnOnce(&mut Where),
    ) -> &mut Self {
        let on = self.fluent(f);
        self.push_join("INNER", table.into(), alias, on)
    }

    /// LEFT JOIN with the ON condition built fluently.
    pub fn left_join_fn(
        &mut self,
        table: impl Into<Field>,
        alias: Option<&str>,
        f: impl FnOnce(&mut Where),
    ) -> &mut Self {
        let on = self.fluent(f);
        self.push_join("LEFT", table.into(), alias, on)
    }

    /// RIGHT JOIN with the ON condition built fluently.
    pub fn right_join_fn(
        &mut self,
        table: impl Into<Field>,
        alias: Option<&str>,
        f: impl FnOnce(&mut Where),
    ) -> &mut Self {
        let on = self.fluent(f);
        self.push_join("RIGHT", table.into(), alias, on)
    }

    /// `WHERE <condition>`. A condition that compiles to nothing leaves the
    /// statement untouched, keyword included.
    pub fn where_(&mut self, cond: impl Into<CondArg>) -> BuildResult<&mut Self> {
        self.where_with(cond, "WHERE", None)
    }

    /// WHERE with a custom keyword and an optional trailing token. Errors are
    /// raised before any token is appended.
    pub fn where_with(
        &mut self,
        cond: impl Into<CondArg>,
        prep: &str,
        after: Option<&str>,
    ) -> BuildResult<&mut Self> {
        let (sql, params) = cond.into().compile(&self.quoter)?;
        if sql.is_empty() {
            return Ok(self);
        }
        if !prep.is_empty() {
            self.append(prep);
        }
        self.append_params(sql, params);
        if let Some(after) = after {
            self.append(after);
        }
        Ok(self)
    }

    /// WHERE built fluently. Never fails; an empty chain appends nothing.
    pub fn where_fn(&mut self, f: impl FnOnce(&mut Where)) -> &mut Self {
        let (sql, params) = self.fluent(f);
        if sql.is_empty() {
            return self;
        }
        self.append("WHERE");
        self.append_params(sql, params)
    }

    /// `HAVING <condition>`. The keyword is always appended, even when the
    /// condition compiles to nothing.
    pub fn having(&mut self, cond: impl Into<CondArg>) -> BuildResult<&mut Self> {
        let (sql, params) = cond.into().compile(&self.quoter)?;
        self.append("HAVING");
        if !sql.is_empty() {
            self.append_params(sql, params);
        }
        Ok(self)
    }

    /// HAVING built fluently. The keyword is always appended; predicate text
    /// and params only when the chain is non-empty.
    pub fn having_fn(&mut self, f: impl FnOnce(&mut Where)) -> &mut Self {
        let (sql, params) = self.fluent(f);
        self.append("HAVING");
        if !sql.is_empty() {
            self.append_params(sql, params);
        }
        self
    }

    /// `NAME(<quoted exp>)`, optionally aliased. Returns a fragment for use
    /// in a projection list.
    pub fn func(&mut self, name: &str, exp: &str, alias: Option<&str>) -> Raw {
        let inner = if exp.is_empty() {
            String::new()
        } else {
            self.quoter.path(exp)
        };
        let f = Raw::new(format!("{name}({inner})"));
        match alias {
            Some(a) => self.as_(f, a),
            None => f,
        }
    }

    /// `SELECT COUNT(<column>)`, optionally aliased; empty column counts `*`.
    pub fn count(&mut self, column: &str, alias: Option<&str>) -> &mut Self {
        let column = if column.is_empty() { "*" } else { column };
        let f = self.func("COUNT", column, alias);
        self.select([f])
    }

    /// `ORDER BY`; a `-` prefix orders descending.
    pub fn order<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.append("ORDER BY");
        let rendered: Vec<String> = fields
            .into_iter()
            .map(|f| {
                let f = f.as_ref();
                match f.strip_prefix('-') {
                    Some(name) => format!("{} DESC", self.quoter.path(name)),
                    None => format!("{} ASC", self.quoter.path(f)),
                }
            })
            .collect();
        self.append(rendered.join(", "))
    }

    /// `GROUP BY <fields>`.
    pub fn group<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        self.append("GROUP BY");
        let rendered: Vec<String> = fields
            .into_iter()
            .map(|f| self.quote(f).into_string())
            .collect();
        self.append(rendered.join(", "))
    }

    /// `LIMIT ?` with an optional `OFFSET ?`, both bound as parameters.
    pub fn limit(&mut self, count: i64, offset: Option<i64>) -> &mut Self {
        self.append("LIMIT ?");
        self.params.push(Value::Int(count));
        if let Some(offset) = offset {
            self.append("OFFSET ?");
            self.params.push(Value::Int(offset));
        }
        self
    }

    /// `LIMIT 1` and mark the statement as single-row.
    pub fn one(&mut self, offset: Option<i64>) -> &mut Self {
        self.limit(1, offset);
        self.one = true;
        self
    }

    /// Set the single-row marker without touching the sql.
    pub fn set_one(&mut self, is: bool) -> &mut Self {
        self.one = is;
        self
    }

    /// Single-row marker, read by row-mapping callers.
    pub fn is_one(&self) -> bool {
        self.one
    }

    /// Set the nested-tables marker, read by row-mapping callers of
    /// multi-table selects.
    pub fn set_nest_tables(&mut self, is: bool) -> &mut Self {
        self.nest_tables = is;
        self
    }

    /// Nested-tables marker.
    pub fn nest_tables(&self) -> bool {
        self.nest_tables
    }

    /// Join tokens into the final sql and return it with the bound
    /// parameters. Idempotent; the builder stays usable.
    pub fn build(&self) -> (String, Vec<Value>) {
        let sql = self.sql.join(" ");
        debug!(params = self.params.len(), sql = %sql, "built statement");
        (sql, self.params.clone())
    }
}
