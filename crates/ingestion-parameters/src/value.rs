//! Typed scalar values read from one row/column of a dataset.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ParameterError;

/// A single datum bound to one statement parameter.
///
/// `Vector` carries embedding vectors. Elements are optional so that an
/// all-missing vector can be represented and collapsed to SQL `NULL`; a vector
/// mixing missing and present elements is rejected by the encoder. NaN and
/// infinite elements are treated as missing.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Decimal(Decimal),
    Vector(Vec<Option<f64>>),
}

impl ScalarValue {
    /// Build a fully populated vector value.
    pub fn vector<I, F>(values: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<f64>,
    {
        Self::Vector(values.into_iter().map(|v| Some(v.into())).collect())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
            Self::Timestamp(_) => "timestamp",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Decimal(_) => "decimal",
            Self::Vector(_) => "vector",
        }
    }

    /// Convert an untyped JSON value into a scalar.
    ///
    /// This is the ingestion boundary for data that does not arrive typed:
    /// objects, arrays holding anything but numbers and nulls, and integers
    /// outside the `i64` range fail with `UnsupportedValueType`.
    pub fn from_json(value: &Value) -> Result<Self, ParameterError> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Integer(i))
                } else if n.is_u64() {
                    Err(ParameterError::unsupported(n))
                } else {
                    n.as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| ParameterError::unsupported(n))
                }
            }
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Null => Ok(None),
                    Value::Number(n) => n
                        .as_f64()
                        .map(Some)
                        .ok_or_else(|| ParameterError::unsupported(value)),
                    _ => Err(ParameterError::unsupported(value)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Vector),
            Value::Object(_) => Err(ParameterError::unsupported(value)),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Timestamp(ts) => write!(f, "{ts}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Vector(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Some(x) => write!(f, "{x}")?,
                        None => f.write_str("null")?,
                    }
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for ScalarValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl From<NaiveDateTime> for ScalarValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDate> for ScalarValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveTime> for ScalarValue {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

impl From<Decimal> for ScalarValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<Vec<f64>> for ScalarValue {
    fn from(value: Vec<f64>) -> Self {
        Self::vector(value)
    }
}

impl From<Vec<f32>> for ScalarValue {
    fn from(value: Vec<f32>) -> Self {
        Self::vector(value)
    }
}

impl<T> From<Option<T>> for ScalarValue
where
    T: Into<ScalarValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
