use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A value bound into a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    Text(String),
    /// Exact decimal value
    Decimal(Decimal),
    /// UUID value
    Uuid(Uuid),
    /// Timestamp with time zone
    Timestamp(DateTime<Utc>),
    /// Calendar date
    Date(NaiveDate),
    /// Raw bytes. Bindable in prepared statements, but has no literal
    /// textual form: literal rendering fails for it.
    Bytes(Vec<u8>),
}

impl Value {
    /// Render this value as an inline SQL literal, or `None` when the value
    /// has no textual form.
    ///
    /// Strings are single-quoted with embedded quotes doubled. Numbers use
    /// their shortest round-trippable decimal form. Temporal values use
    /// their default textual form, single-quoted.
    pub fn literal(&self) -> Option<String> {
        match self {
            Value::Null => Some("NULL".to_string()),
            Value::Bool(true) => Some("TRUE".to_string()),
            Value::Bool(false) => Some("FALSE".to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(n) => Some(n.to_string()),
            Value::Text(s) => Some(format!("'{}'", s.replace('\'', "''"))),
            Value::Decimal(d) => Some(d.to_string()),
            Value::Uuid(u) => Some(format!("'{}'", u)),
            Value::Timestamp(t) => Some(format!("'{}'", t)),
            Value::Date(d) => Some(format!("'{}'", d)),
            Value::Bytes(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
