//! Element-wise binary operators over typed scalars.
//!
//! Operators are defined once per supported dtype pairing with
//! host-language numeric promotion: booleans promote to integers in
//! arithmetic and bitwise contexts, integers promote to floats when mixed
//! with them, true division always yields a float, and floor
//! division/modulo round toward negative infinity.

use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::types::Value;

/// The binary operators understood by [`Column`] broadcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition; concatenation for text.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// True division; always a float for numeric operands.
    Div,
    /// Floor division, rounding toward negative infinity.
    FloorDiv,
    /// Modulo with the sign of the divisor.
    Rem,
    /// Exponentiation; an integer base with a negative exponent is a float.
    Pow,
    /// Logical AND for booleans, bitwise AND for integers.
    And,
    /// Logical OR for booleans, bitwise OR for integers.
    Or,
    /// Logical XOR for booleans, bitwise XOR for integers.
    Xor,
    /// Equality; mismatched kinds compare unequal.
    Eq,
    /// Inequality; mismatched kinds compare unequal.
    Ne,
    /// Less-than.
    Lt,
    /// Less-than-or-equal.
    Le,
    /// Greater-than.
    Gt,
    /// Greater-than-or-equal.
    Ge,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

/// Right-hand side of a broadcasting operator: a whole column (pairwise,
/// lengths must match) or a single scalar (applied to every element).
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// Pairwise column operand.
    Column(&'a Column),
    /// Broadcast scalar operand.
    Scalar(Value),
}

impl<'a> From<&'a Column> for Operand<'a> {
    fn from(col: &'a Column) -> Self {
        Operand::Column(col)
    }
}

impl From<Value> for Operand<'_> {
    fn from(v: Value) -> Self {
        Operand::Scalar(v)
    }
}

impl From<bool> for Operand<'_> {
    fn from(v: bool) -> Self {
        Operand::Scalar(Value::Bool(v))
    }
}

impl From<i64> for Operand<'_> {
    fn from(v: i64) -> Self {
        Operand::Scalar(Value::Int64(v))
    }
}

impl From<f64> for Operand<'_> {
    fn from(v: f64) -> Self {
        Operand::Scalar(Value::Float64(v))
    }
}

impl From<&str> for Operand<'_> {
    fn from(v: &str) -> Self {
        Operand::Scalar(Value::Utf8(v.to_owned()))
    }
}

/// Numeric view with promotion; booleans count as 0/1 integers.
enum Num {
    Int(i64),
    Float(f64),
}

fn numeric(v: &Value) -> Option<Num> {
    match v {
        Value::Bool(b) => Some(Num::Int(i64::from(*b))),
        Value::Int64(i) => Some(Num::Int(*i)),
        Value::Float64(f) => Some(Num::Float(*f)),
        Value::Utf8(_) => None,
    }
}

/// Apply `op` to a pair of scalars.
pub(crate) fn apply(op: BinaryOp, lhs: &Value, rhs: &Value) -> FrameResult<Value> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(value_eq(lhs, rhs))),
        BinaryOp::Ne => Ok(Value::Bool(!value_eq(lhs, rhs))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => ordered(op, lhs, rhs),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => bitwise(op, lhs, rhs),
        _ => arithmetic(op, lhs, rhs),
    }
}

/// Equality across kinds: numeric operands compare by value, everything
/// else must match kinds exactly or compares unequal.
fn value_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Utf8(a), Value::Utf8(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => match (numeric(lhs), numeric(rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => a == b,
            (Some(a), Some(b)) => as_f64(a) == as_f64(b),
            _ => false,
        },
    }
}

fn as_f64(n: Num) -> f64 {
    match n {
        Num::Int(i) => i as f64,
        Num::Float(f) => f,
    }
}

fn ordered(op: BinaryOp, lhs: &Value, rhs: &Value) -> FrameResult<Value> {
    let outcome = |lt: bool, eq: bool| match op {
        BinaryOp::Lt => lt,
        BinaryOp::Le => lt || eq,
        BinaryOp::Gt => !lt && !eq,
        BinaryOp::Ge => !lt,
        _ => unreachable!("non-ordered op dispatched to ordered()"),
    };
    match (lhs, rhs) {
        (Value::Utf8(a), Value::Utf8(b)) => Ok(Value::Bool(outcome(a < b, a == b))),
        _ => match (numeric(lhs), numeric(rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(Value::Bool(outcome(a < b, a == b))),
            (Some(a), Some(b)) => {
                let (a, b) = (as_f64(a), as_f64(b));
                // NaN orders like the host language: every comparison false.
                Ok(Value::Bool(outcome(a < b, a == b)))
            }
            _ => Err(unsupported(op, lhs, rhs)),
        },
    }
}

fn bitwise(op: BinaryOp, lhs: &Value, rhs: &Value) -> FrameResult<Value> {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match op {
            BinaryOp::And => a & b,
            BinaryOp::Or => a | b,
            BinaryOp::Xor => a ^ b,
            _ => unreachable!("non-bitwise op dispatched to bitwise()"),
        })),
        _ => {
            let (a, b) = match (int_like(lhs), int_like(rhs)) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(unsupported(op, lhs, rhs)),
            };
            Ok(Value::Int64(match op {
                BinaryOp::And => a & b,
                BinaryOp::Or => a | b,
                BinaryOp::Xor => a ^ b,
                _ => unreachable!("non-bitwise op dispatched to bitwise()"),
            }))
        }
    }
}

fn int_like(v: &Value) -> Option<i64> {
    match v {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Int64(i) => Some(*i),
        _ => None,
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> FrameResult<Value> {
    if let (Value::Utf8(a), Value::Utf8(b)) = (lhs, rhs) {
        return match op {
            BinaryOp::Add => Ok(Value::Utf8(format!("{a}{b}"))),
            _ => Err(unsupported(op, lhs, rhs)),
        };
    }

    let (a, b) = match (numeric(lhs), numeric(rhs)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(unsupported(op, lhs, rhs)),
    };

    match (a, b) {
        (Num::Int(a), Num::Int(b)) => int_arithmetic(op, a, b),
        (a, b) => float_arithmetic(op, as_f64(a), as_f64(b)),
    }
}

fn int_arithmetic(op: BinaryOp, a: i64, b: i64) -> FrameResult<Value> {
    let overflow = || FrameError::domain(format!("integer overflow in {a} {} {b}", op.symbol()));
    match op {
        BinaryOp::Add => a.checked_add(b).map(Value::Int64).ok_or_else(overflow),
        BinaryOp::Sub => a.checked_sub(b).map(Value::Int64).ok_or_else(overflow),
        BinaryOp::Mul => a.checked_mul(b).map(Value::Int64).ok_or_else(overflow),
        BinaryOp::Div => {
            if b == 0 {
                Err(FrameError::domain("division by zero"))
            } else {
                Ok(Value::Float64(a as f64 / b as f64))
            }
        }
        BinaryOp::FloorDiv => {
            if b == 0 {
                Err(FrameError::domain("division by zero"))
            } else {
                Ok(Value::Int64(floor_div(a, b)))
            }
        }
        BinaryOp::Rem => {
            if b == 0 {
                Err(FrameError::domain("modulo by zero"))
            } else {
                Ok(Value::Int64(floor_rem(a, b)))
            }
        }
        BinaryOp::Pow => {
            if b >= 0 {
                let exp = u32::try_from(b).map_err(|_| overflow())?;
                a.checked_pow(exp).map(Value::Int64).ok_or_else(overflow)
            } else {
                Ok(Value::Float64((a as f64).powf(b as f64)))
            }
        }
        _ => unreachable!("non-arithmetic op dispatched to int_arithmetic()"),
    }
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) { q - 1 } else { q }
}

/// Modulo with the sign of the divisor, matching [`floor_div`].
fn floor_rem(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) { r + b } else { r }
}

fn float_arithmetic(op: BinaryOp, a: f64, b: f64) -> FrameResult<Value> {
    // Float division by zero follows IEEE-754 (inf/NaN propagate), since
    // NaN already doubles as the missing-value marker.
    Ok(Value::Float64(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::FloorDiv => (a / b).floor(),
        BinaryOp::Rem => a - b * (a / b).floor(),
        BinaryOp::Pow => a.powf(b),
        _ => unreachable!("non-arithmetic op dispatched to float_arithmetic()"),
    }))
}

fn unsupported(op: BinaryOp, lhs: &Value, rhs: &Value) -> FrameError {
    FrameError::unsupported(format!(
        "operator {} not defined between {} and {}",
        op.symbol(),
        lhs.data_type(),
        rhs.data_type()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_pair_promotion() {
        assert_eq!(
            apply(BinaryOp::Add, &Value::Int64(2), &Value::Int64(3)).unwrap(),
            Value::Int64(5)
        );
        assert_eq!(
            apply(BinaryOp::Div, &Value::Int64(3), &Value::Int64(2)).unwrap(),
            Value::Float64(1.5)
        );
        assert_eq!(
            apply(BinaryOp::FloorDiv, &Value::Int64(-7), &Value::Int64(2)).unwrap(),
            Value::Int64(-4)
        );
        assert_eq!(
            apply(BinaryOp::Rem, &Value::Int64(-7), &Value::Int64(2)).unwrap(),
            Value::Int64(1)
        );
    }

    #[test]
    fn mixed_numeric_promotes_to_float() {
        assert_eq!(
            apply(BinaryOp::Mul, &Value::Int64(2), &Value::Float64(1.5)).unwrap(),
            Value::Float64(3.0)
        );
        assert_eq!(
            apply(BinaryOp::Add, &Value::Bool(true), &Value::Int64(1)).unwrap(),
            Value::Int64(2)
        );
    }

    #[test]
    fn negative_int_exponent_is_float() {
        assert_eq!(
            apply(BinaryOp::Pow, &Value::Int64(2), &Value::Int64(-1)).unwrap(),
            Value::Float64(0.5)
        );
        assert_eq!(
            apply(BinaryOp::Pow, &Value::Int64(2), &Value::Int64(10)).unwrap(),
            Value::Int64(1024)
        );
    }

    #[test]
    fn integer_division_by_zero_is_a_domain_error() {
        let err = apply(BinaryOp::FloorDiv, &Value::Int64(1), &Value::Int64(0)).unwrap_err();
        assert!(matches!(err, FrameError::Domain { .. }));
        // Float division propagates IEEE infinities instead.
        assert_eq!(
            apply(BinaryOp::Div, &Value::Float64(1.0), &Value::Float64(0.0)).unwrap(),
            Value::Float64(f64::INFINITY)
        );
    }

    #[test]
    fn comparisons_yield_bools() {
        assert_eq!(
            apply(BinaryOp::Gt, &Value::Int64(2), &Value::Float64(1.5)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            apply(BinaryOp::Lt, &Value::Utf8("a".into()), &Value::Utf8("b".into())).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn nan_never_equals_itself() {
        assert_eq!(
            apply(BinaryOp::Eq, &Value::Float64(f64::NAN), &Value::Float64(f64::NAN)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            apply(BinaryOp::Ne, &Value::Float64(f64::NAN), &Value::Float64(f64::NAN)).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn mismatched_kinds_compare_unequal_but_do_not_order() {
        assert_eq!(
            apply(BinaryOp::Eq, &Value::Utf8("1".into()), &Value::Int64(1)).unwrap(),
            Value::Bool(false)
        );
        let err = apply(BinaryOp::Lt, &Value::Utf8("1".into()), &Value::Int64(1)).unwrap_err();
        assert!(matches!(err, FrameError::Unsupported { .. }));
    }

    #[test]
    fn bitwise_ops_on_bools_and_ints() {
        assert_eq!(
            apply(BinaryOp::And, &Value::Bool(true), &Value::Bool(false)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            apply(BinaryOp::Xor, &Value::Int64(0b1100), &Value::Int64(0b1010)).unwrap(),
            Value::Int64(0b0110)
        );
        let err = apply(BinaryOp::Or, &Value::Float64(1.0), &Value::Float64(1.0)).unwrap_err();
        assert!(matches!(err, FrameError::Unsupported { .. }));
    }

    #[test]
    fn text_add_concatenates() {
        assert_eq!(
            apply(BinaryOp::Add, &Value::Utf8("ab".into()), &Value::Utf8("cd".into())).unwrap(),
            Value::Utf8("abcd".into())
        );
        let err = apply(BinaryOp::Sub, &Value::Utf8("a".into()), &Value::Utf8("b".into()))
            .unwrap_err();
        assert!(matches!(err, FrameError::Unsupported { .. }));
    }
}
