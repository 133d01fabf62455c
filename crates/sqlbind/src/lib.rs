//! # sqlbind
//!
//! A parameterized SQL statement builder.
//!
//! ## Features
//!
//! - **SQL explicit**: the builder is an ordered token list, clauses append
//!   exactly where you call them
//! - **Placeholder safety**: every caller value binds through `?`; only
//!   [`Raw`] fragments reach the output verbatim
//! - **Two condition styles**: declarative `json!({...})` trees and a fluent
//!   [`Where`] chain, with textually identical output
//! - **Pluggable quoting**: backtick by default, ANSI double quotes or a
//!   custom policy via [`Quoter`]
//! - **Computed expressions**: functions, operator chains, and interpolation
//!   templates via [`Attr`]
//!
//! ## Building a statement
//!
//! ```ignore
//! use serde_json::json;
//! use sqlbind::Builder;
//!
//! let mut b = Builder::new();
//! b.select_all().from("user", None);
//! b.where_(json!({ "age": { "$gte": 18 }, "deleted_at": null }))?;
//! b.order(["-created_at", "id"]).limit(10, None);
//!
//! let (sql, params) = b.build();
//! // SELECT * FROM `user` WHERE `age` >= ? AND `deleted_at` IS NULL
//! // ORDER BY `created_at` DESC, `id` ASC LIMIT ?
//! ```

pub mod attr;
pub mod builder;
pub mod cond;
pub mod error;
mod json_where;
mod ops;
pub mod quoter;
pub mod raw;
mod template;
pub mod value;
pub mod where_clause;

pub use attr::{
    Attr, OpChain, OpValue, Operand, avg, count, decr, func, incr, max, min, op, quote, raw, sum,
    template,
};
pub use builder::{Builder, CondArg, Field, SelectItem, Tables};
pub use cond::{Cond, CondValue};
pub use error::{BuildError, BuildResult};
pub use quoter::Quoter;
pub use raw::Raw;
pub use template::TplArg;
pub use value::Value;
pub use where_clause::Where;

#[cfg(test)]
mod tests;
