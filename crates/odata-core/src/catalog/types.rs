//! Core type definitions for the catalog.

use crate::error::Error;
use odata_proto::{parse_datetime, Value};

/// Scalar data types an entity set field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// UTF-8 string.
    String,
    /// Date and time without a timezone.
    DateTime,
}

/// Comparison family of a field, as reported by the storage capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Integers and floats.
    Numeric,
    /// Strings and anything else compared by text.
    Text,
    /// Dates and datetimes.
    Date,
}

impl ScalarType {
    /// Parse a type name as used in schema fixtures.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" | "boolean" => Some(ScalarType::Bool),
            "int" | "integer" => Some(ScalarType::Int),
            "float" | "double" | "decimal" => Some(ScalarType::Float),
            "string" | "text" => Some(ScalarType::String),
            "datetime" | "date" => Some(ScalarType::DateTime),
            _ => None,
        }
    }

    /// Get the comparison family of this type.
    pub fn kind(&self) -> FieldKind {
        match self {
            ScalarType::Int | ScalarType::Float => FieldKind::Numeric,
            ScalarType::DateTime => FieldKind::Date,
            ScalarType::Bool | ScalarType::String => FieldKind::Text,
        }
    }

    /// Coerce literal text into a value of this type.
    ///
    /// Integer fields also accept decimal text so that `value gt 2.5` compares
    /// numerically. Returns `None` when the text is not a literal of the type;
    /// string fields never coerce here since any text is a valid string.
    pub fn parse_literal(&self, text: &str) -> Option<Value> {
        match self {
            ScalarType::Bool => match text {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            ScalarType::Int => match text.parse::<i64>() {
                Ok(i) => Some(Value::Int64(i)),
                // integral text outside the i64 range is not an integer literal
                Err(_) if is_integral(text) => None,
                Err(_) => parse_finite_float(text),
            },
            ScalarType::Float => parse_finite_float(text),
            ScalarType::DateTime => parse_datetime(text).ok().map(Value::DateTime),
            ScalarType::String => None,
        }
    }

    /// Check a stored value against this type, converting where lossless.
    ///
    /// Integers widen into float fields and datetime text is parsed.
    pub fn conform(&self, value: Value) -> Result<Value, Error> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),
            (ScalarType::Bool, v @ Value::Bool(_)) => Ok(v),
            (ScalarType::Int, v @ Value::Int64(_)) => Ok(v),
            (ScalarType::Float, v @ Value::Float64(_)) => Ok(v),
            (ScalarType::Float, Value::Int64(i)) => Ok(Value::Float64(i as f64)),
            (ScalarType::String, v @ Value::String(_)) => Ok(v),
            (ScalarType::DateTime, v @ Value::DateTime(_)) => Ok(v),
            (ScalarType::DateTime, Value::String(s)) => Ok(Value::DateTime(parse_datetime(&s)?)),
            (expected, other) => Err(Error::InvalidData(format!(
                "expected {:?} value, got {}",
                expected,
                other.type_name()
            ))),
        }
    }
}

fn is_integral(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_finite_float(text: &str) -> Option<Value> {
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float64)
}
