//! Fluent condition builder.
//!
//! [`Where`] accumulates clauses through chained method calls and joins them
//! with its conjunction. Output is textually identical to what the
//! declarative compiler emits for the same conditions, so the two styles can
//! be mixed freely in one statement.

use crate::attr::Operand;
use crate::quoter::Quoter;
use crate::value::Value;

/// A chain of comparison clauses joined by one conjunction.
///
/// Created by [`Builder::new_where`](crate::Builder::new_where), the
/// `*_fn` clause methods, and [`Where::or`]; each clause method borrows
/// mutably and returns `&mut Self` for chaining. A finished chain converts
/// into a condition argument, so it can go wherever a declarative tree goes.
#[derive(Debug, Clone)]
pub struct Where {
    quoter: Quoter,
    conjunction: String,
    sql: Vec<String>,
    params: Vec<Value>,
}

impl Where {
    /// Fresh accumulator for the given quoting policy and conjunction.
    pub fn new(quoter: Quoter, conjunction: &str) -> Self {
        Where {
            quoter,
            conjunction: conjunction.to_string(),
            sql: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Replace the conjunction used to join clauses.
    pub fn conjunction(&mut self, c: &str) -> &mut Self {
        self.conjunction = c.to_string();
        self
    }

    fn holder(&mut self, value: Operand) -> String {
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

    /// Push `field <op> <rendered>` with the field quoted. Escape hatch for
    /// operators without a dedicated method.
    pub fn op(&mut self, field: &str, op: &str, rendered: &str) -> &mut Self {
        self.sql
            .push(format!("{} {} {}", self.quoter.path(field), op, rendered));
        self
    }

    fn value_op(&mut self, field: &str, op: &str, value: impl Into<Operand>) -> &mut Self {
        let rendered = self.holder(value.into());
        self.op(field, op, &rendered)
    }

    /// `field = ?`
    pub fn eq(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "=", value)
    }

    /// `field != ?`
    pub fn ne(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "!=", value)
    }

    /// `field >= ?`
    pub fn gte(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, ">=", value)
    }

    /// `field > ?`
    pub fn gt(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, ">", value)
    }

    /// `field <= ?`
    pub fn lte(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "<=", value)
    }

    /// `field < ?`
    pub fn lt(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "<", value)
    }

    /// `field IS ?`
    pub fn is(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "IS", value)
    }

    /// `field IS NOT ?`
    pub fn not(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "IS NOT", value)
    }

    /// `field LIKE ?`
    pub fn like(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "LIKE", value)
    }

    /// `field NOT LIKE ?`
    pub fn notlike(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "NOT LIKE", value)
    }

    /// `field ILIKE ?`
    pub fn ilike(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "ILIKE", value)
    }

    /// `field NOT ILIKE ?`
    pub fn notilike(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "NOT ILIKE", value)
    }

    /// `field REGEXP ?`
    pub fn regexp(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "REGEXP", value)
    }

    /// `field NOT REGEXP ?`
    pub fn notregexp(&mut self, field: &str, value: impl Into<Operand>) -> &mut Self {
        self.value_op(field, "NOT REGEXP", value)
    }

    fn values_op(
        &mut self,
        field: &str,
        op: &str,
        values: impl IntoIterator<Item = impl Into<Operand>>,
    ) -> &mut Self {
        let holders: Vec<String> = values
            .into_iter()
            .map(|v| self.holder(v.into()))
            .collect();
        let rendered = format!("({})", holders.join(", "));
        self.op(field, op, &rendered)
    }

    /// `field IN (?, ?, ...)`
    pub fn in_list(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = impl Into<Operand>>,
    ) -> &mut Self {
        self.values_op(field, "IN", values)
    }

    /// `field NOT IN (?, ?, ...)`
    pub fn not_in(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = impl Into<Operand>>,
    ) -> &mut Self {
        self.values_op(field, "NOT IN", values)
    }

    /// `field BETWEEN ? AND ?`
    pub fn between(
        &mut self,
        field: &str,
        start: impl Into<Operand>,
        end: impl Into<Operand>,
    ) -> &mut Self {
        let start = self.holder(start.into());
        let end = self.holder(end.into());
        let rendered = format!("{start} AND {end}");
        self.op(field, "BETWEEN", &rendered)
    }

    /// `field NOT BETWEEN ? AND ?`
    pub fn not_between(
        &mut self,
        field: &str,
        start: impl Into<Operand>,
        end: impl Into<Operand>,
    ) -> &mut Self {
        let start = self.holder(start.into());
        let end = self.holder(end.into());
        let rendered = format!("{start} AND {end}");
        self.op(field, "NOT BETWEEN", &rendered)
    }

    /// Append a parenthesized OR group built by the closure.
    pub fn or(&mut self, f: impl FnOnce(&mut Where)) -> &mut Self {
        let mut group = Where::new(self.quoter.clone(), "OR");
        f(&mut group);
        let (sql, params) = group.build();
        self.sql.push(format!("({sql})"));
        self.params.extend(params);
        self
    }

    /// True when no clause has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Join accumulated clauses into `(sql, params)`.
    pub fn build(&self) -> (String, Vec<Value>) {
        (
            self.sql.join(&format!(" {} ", self.conjunction)),
            self.params.clone(),
        )
    }
}
