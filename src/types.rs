//! Scalar data model: dtypes, values, and coercion.
//!
//! Every [`crate::column::Column`] declares one [`DataType`] drawn from a
//! fixed closed set and stores [`Value`]s of exactly that kind. Missing data
//! has no dedicated variant: it is represented as `Float64(NaN)`, which is
//! what the `dropna`/`isna` family keys on.

use std::fmt;

use crate::error::{FrameError, FrameResult};

/// Logical element type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean.
    Bool,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number. The only dtype with a default value
    /// (NaN), which doubles as the missing-data marker.
    Float64,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// Whether this dtype participates in numeric aggregates.
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }

    /// The dtype-specific fallback used when a coercion fails and default
    /// substitution is enabled. Only `Float64` defines one.
    pub fn default_value(self) -> Option<Value> {
        match self {
            DataType::Float64 => Some(Value::Float64(f64::NAN)),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Bool => "bool",
            DataType::Int64 => "int",
            DataType::Float64 => "float",
            DataType::Utf8 => "text",
        };
        f.write_str(name)
    }
}

/// A single typed scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float. `NaN` marks a missing value.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// The dtype this value belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Bool,
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::Utf8(_) => DataType::Utf8,
        }
    }

    /// True only for `Float64(NaN)`; every other value equals itself.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Float64(v) if v.is_nan())
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
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

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(v)
    }
}

/// What to do when a value cannot be coerced to a column's dtype.
///
/// The policy is fixed per column at construction time and also governs
/// later element assignment into that column.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercePolicy {
    /// Surface the failure as a conversion error.
    Fail,
    /// Fall back to this value (normally the dtype's default).
    Substitute(Value),
}

impl CoercePolicy {
    /// The conventional policy for `dtype`: substitute the dtype's default
    /// value where one exists (float ⇒ NaN), otherwise fail.
    pub fn for_dtype(dtype: DataType) -> Self {
        match dtype.default_value() {
            Some(v) => CoercePolicy::Substitute(v),
            None => CoercePolicy::Fail,
        }
    }
}

/// Coerce `value` to `target`, applying `policy` on failure.
///
/// A value already of the target kind is kept as-is.
pub(crate) fn coerce(value: &Value, target: DataType, policy: &CoercePolicy) -> FrameResult<Value> {
    if value.data_type() == target {
        return Ok(value.clone());
    }
    match convert(value, target) {
        Some(v) => Ok(v),
        None => match policy {
            CoercePolicy::Substitute(fallback) => Ok(fallback.clone()),
            CoercePolicy::Fail => Err(FrameError::Conversion {
                value: value.to_string(),
                target,
            }),
        },
    }
}

/// Pure conversion attempt between kinds. `None` means the value has no
/// representation in the target dtype.
fn convert(value: &Value, target: DataType) -> Option<Value> {
    match target {
        DataType::Int64 => match value {
            Value::Int64(v) => Some(Value::Int64(*v)),
            Value::Float64(v) if v.is_finite() => Some(Value::Int64(*v as i64)),
            Value::Float64(_) => None,
            Value::Bool(v) => Some(Value::Int64(i64::from(*v))),
            Value::Utf8(s) => s.trim().parse::<i64>().ok().map(Value::Int64),
        },
        DataType::Float64 => match value {
            Value::Float64(v) => Some(Value::Float64(*v)),
            Value::Int64(v) => Some(Value::Float64(*v as f64)),
            Value::Bool(v) => Some(Value::Float64(if *v { 1.0 } else { 0.0 })),
            Value::Utf8(s) => s.trim().parse::<f64>().ok().map(Value::Float64),
        },
        DataType::Bool => match value {
            Value::Bool(v) => Some(Value::Bool(*v)),
            Value::Int64(v) => Some(Value::Bool(*v != 0)),
            Value::Float64(v) => Some(Value::Bool(*v != 0.0)),
            Value::Utf8(s) => parse_bool(s.trim()).map(Value::Bool),
        },
        DataType::Utf8 => Some(Value::Utf8(value.to_string())),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Dtype inferred from a raw text cell: integer, then float, then text.
///
/// Used by CSV ingestion to reinterpret the first cell of a column.
pub(crate) fn infer_text_dtype(raw: &str) -> DataType {
    let trimmed = raw.trim();
    if trimmed.parse::<i64>().is_ok() {
        DataType::Int64
    } else if trimmed.parse::<f64>().is_ok() {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_keeps_matching_kind() {
        let policy = CoercePolicy::Fail;
        let v = coerce(&Value::Int64(7), DataType::Int64, &policy).unwrap();
        assert_eq!(v, Value::Int64(7));
    }

    #[test]
    fn coerce_float_to_int_truncates_toward_zero() {
        let policy = CoercePolicy::Fail;
        assert_eq!(
            coerce(&Value::Float64(2.9), DataType::Int64, &policy).unwrap(),
            Value::Int64(2)
        );
        assert_eq!(
            coerce(&Value::Float64(-2.9), DataType::Int64, &policy).unwrap(),
            Value::Int64(-2)
        );
    }

    #[test]
    fn coerce_text_failure_substitutes_float_default() {
        let policy = CoercePolicy::for_dtype(DataType::Float64);
        let v = coerce(&Value::Utf8(String::new()), DataType::Float64, &policy).unwrap();
        assert!(v.is_missing());
    }

    #[test]
    fn coerce_text_failure_errors_without_fallback() {
        let err = coerce(&Value::Utf8("2.5".into()), DataType::Int64, &CoercePolicy::Fail)
            .unwrap_err();
        assert!(err.to_string().contains("cannot convert '2.5' to int"));
    }

    #[test]
    fn coerce_nan_to_int_fails() {
        let err = coerce(&Value::Float64(f64::NAN), DataType::Int64, &CoercePolicy::Fail)
            .unwrap_err();
        assert!(matches!(err, FrameError::Conversion { .. }));
    }

    #[test]
    fn infer_prefers_int_then_float_then_text() {
        assert_eq!(infer_text_dtype("42"), DataType::Int64);
        assert_eq!(infer_text_dtype(" -3 "), DataType::Int64);
        assert_eq!(infer_text_dtype("2.5"), DataType::Float64);
        assert_eq!(infer_text_dtype("1e-3"), DataType::Float64);
        assert_eq!(infer_text_dtype("abc"), DataType::Utf8);
        assert_eq!(infer_text_dtype(""), DataType::Utf8);
    }

    #[test]
    fn bool_tokens_follow_csv_conventions() {
        let policy = CoercePolicy::Fail;
        assert_eq!(
            coerce(&Value::Utf8("Yes".into()), DataType::Bool, &policy).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            coerce(&Value::Utf8("0".into()), DataType::Bool, &policy).unwrap(),
            Value::Bool(false)
        );
        assert!(coerce(&Value::Utf8("maybe".into()), DataType::Bool, &policy).is_err());
    }
}
