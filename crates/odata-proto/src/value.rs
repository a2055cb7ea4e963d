//! Runtime value types for query literals and result fields.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Canonical datetime rendering used on the wire (seconds precision).
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Datetime rendering with millisecond precision.
const DATETIME_FORMAT_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// A runtime value stored in a record or used as a compiled literal.
///
/// The variants map onto the scalar types an entity set can declare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    String(String),
    /// Date and time without a timezone.
    DateTime(NaiveDateTime),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render the value as plain text.
    ///
    /// This is the representation used when two values of different types are
    /// compared lexicographically.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int64(i) => i.to_string(),
            Value::Float64(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => format_datetime(dt),
        }
    }

    /// Get a description of the value type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int",
            Value::Float64(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
        }
    }
}

/// Format a datetime as `YYYY-MM-DDTHH:MM:SS`, adding milliseconds when the
/// value carries a sub-second part.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format(DATETIME_FORMAT).to_string()
    } else {
        dt.format(DATETIME_FORMAT_MILLIS).to_string()
    }
}

/// Parse `YYYY-MM-DD[THH:MM[:SS[.fff]]][Z]` into a datetime.
///
/// A bare date is read as midnight. A trailing `Z` is accepted and dropped,
/// values are always handled as naive UTC.
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime, Error> {
    let trimmed = text.strip_suffix('Z').unwrap_or(text);

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| Error::invalid_literal(text, "datetime"))
}

// Conversion implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}
