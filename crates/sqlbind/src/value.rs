//! Bind-parameter values.
//!
//! Every value that reaches the database travels through [`Value`]: a closed
//! set of scalar shapes that placeholder-style drivers can bind positionally.
//! Builders collect these in order of `?` appearance.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// A scalar bind parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    /// Calendar date without time-of-day.
    Date(NaiveDate),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
}

impl Value {
    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

macro_rules! impl_value_int {
    ($($ty:ty)*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_value_uint {
    ($($ty:ty)*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::UInt(v as u64)
            }
        })*
    };
}

impl_value_int!(i8 i16 i32 i64 isize);
impl_value_uint!(u8 u16 u32 u64 usize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(DateTime::from_naive_utc_and_offset(v, Utc))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

/// Implement `From<scalar>` for an enum wrapping [`Value`] through the given
/// constructor path. Keeps operand-style enums convertible from plain Rust
/// scalars without a blanket impl.
macro_rules! impl_from_scalars {
    ($target:ty, $wrap:path) => {
        impl_from_scalars!(@each $target, $wrap; bool i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64 String);

        impl From<&str> for $target {
            fn from(v: &str) -> Self {
                $wrap($crate::value::Value::from(v))
            }
        }

        impl From<chrono::NaiveDate> for $target {
            fn from(v: chrono::NaiveDate) -> Self {
                $wrap($crate::value::Value::from(v))
            }
        }

        impl From<chrono::DateTime<chrono::Utc>> for $target {
            fn from(v: chrono::DateTime<chrono::Utc>) -> Self {
                $wrap($crate::value::Value::from(v))
            }
        }
    };
    (@each $target:ty, $wrap:path; $($ty:ty)*) => {
        $(impl From<$ty> for $target {
            fn from(v: $ty) -> Self {
                $wrap($crate::value::Value::from(v))
            }
        })*
    };
}

pub(crate) use impl_from_scalars;
