//! Homogeneously-typed column of scalar values.
//!
//! A [`Column`] is the unit of storage: an ordered sequence of [`Value`]s
//! that all share one declared [`DataType`], plus the coercion policy that
//! governed its construction. Every selection returns a fresh column that
//! owns its buffer; two columns never observe each other's mutations.

use std::fmt;

use crate::error::{FrameError, FrameResult};
use crate::index::{gather_position, Selector};
use crate::ops::{self, BinaryOp, Operand};
use crate::types::{coerce, infer_text_dtype, CoercePolicy, DataType, Value};

/// An ordered, homogeneously-typed sequence of scalar values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    data: Vec<Value>,
    dtype: DataType,
    policy: CoercePolicy,
}

/// Right-hand side of an element assignment: a single scalar broadcast to
/// every resolved position, or a sequence matched position-for-position.
#[derive(Debug, Clone)]
pub enum Assign {
    /// Broadcast one value to every resolved position.
    Scalar(Value),
    /// Assign values pairwise; the coerced length must equal the number of
    /// resolved positions.
    Sequence(Vec<Value>),
}

impl From<Value> for Assign {
    fn from(v: Value) -> Self {
        Assign::Scalar(v)
    }
}

impl From<bool> for Assign {
    fn from(v: bool) -> Self {
        Assign::Scalar(Value::Bool(v))
    }
}

impl From<i64> for Assign {
    fn from(v: i64) -> Self {
        Assign::Scalar(Value::Int64(v))
    }
}

impl From<f64> for Assign {
    fn from(v: f64) -> Self {
        Assign::Scalar(Value::Float64(v))
    }
}

impl From<&str> for Assign {
    fn from(v: &str) -> Self {
        Assign::Scalar(Value::Utf8(v.to_owned()))
    }
}

impl From<Vec<Value>> for Assign {
    fn from(values: Vec<Value>) -> Self {
        Assign::Sequence(values)
    }
}

impl From<&Column> for Assign {
    fn from(col: &Column) -> Self {
        Assign::Sequence(col.data.clone())
    }
}

impl Column {
    /// Create a column from values with an optional declared dtype.
    ///
    /// When `dtype` is omitted it is deduced from the first element (an
    /// empty input defaults to float). Every element is coerced to the
    /// resolved dtype under the dtype's conventional policy: float
    /// substitutes NaN on failure, every other dtype fails with a
    /// conversion error.
    pub fn new(
        values: impl IntoIterator<Item = Value>,
        dtype: Option<DataType>,
    ) -> FrameResult<Self> {
        Self::build(values.into_iter().collect(), dtype, false, None)
    }

    /// Create a column with an explicit coercion policy.
    pub fn with_policy(
        values: impl IntoIterator<Item = Value>,
        dtype: DataType,
        policy: CoercePolicy,
    ) -> FrameResult<Self> {
        Self::build(values.into_iter().collect(), Some(dtype), false, Some(policy))
    }

    /// Create a column from raw text cells, as CSV ingestion does.
    ///
    /// Without a declared dtype, the first cell is reinterpreted by
    /// attempting an integer parse, then a float parse, before falling back
    /// to text.
    pub fn from_text(
        cells: impl IntoIterator<Item = String>,
        dtype: Option<DataType>,
    ) -> FrameResult<Self> {
        let values = cells.into_iter().map(Value::Utf8).collect();
        Self::build(values, dtype, true, None)
    }

    fn build(
        values: Vec<Value>,
        declared: Option<DataType>,
        infer_text: bool,
        policy: Option<CoercePolicy>,
    ) -> FrameResult<Self> {
        let dtype = match declared {
            Some(t) => t,
            None => match values.first() {
                Some(Value::Utf8(raw)) if infer_text => infer_text_dtype(raw),
                Some(first) => first.data_type(),
                None => DataType::Float64,
            },
        };
        let policy = policy.unwrap_or_else(|| CoercePolicy::for_dtype(dtype));

        let mut data = Vec::with_capacity(values.len());
        for value in &values {
            data.push(coerce(value, dtype, &policy)?);
        }
        Ok(Self { data, dtype, policy })
    }

    /// Wrap an already-validated buffer without copying.
    ///
    /// The buffer is moved in, so no other reference can observe it; every
    /// element's kind must already equal `dtype`.
    pub(crate) fn from_parts(data: Vec<Value>, dtype: DataType) -> Self {
        debug_assert!(data.iter().all(|v| v.data_type() == dtype));
        Self {
            data,
            dtype,
            policy: CoercePolicy::for_dtype(dtype),
        }
    }

    /// The declared element type.
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// The coercion policy applied by construction and assignment.
    pub fn policy(&self) -> &CoercePolicy {
        &self.policy
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the column holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the backing values.
    pub fn values(&self) -> &[Value] {
        &self.data
    }

    /// Iterate over the values in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.data.iter()
    }

    /// Whether any element equals `value`.
    pub fn contains(&self, value: &Value) -> bool {
        self.data.contains(value)
    }

    /// Extract the only element of a single-element column.
    pub fn item(&self) -> FrameResult<Value> {
        if self.len() != 1 {
            return Err(FrameError::SizeMismatch {
                expected: 1,
                actual: self.len(),
            });
        }
        Ok(self.data[0].clone())
    }

    /// Resolve a selector to concrete element positions.
    ///
    /// Columns accept a single position, a span, a boolean mask of matching
    /// length, or an integer gather list; label selectors belong to tables.
    fn resolve(&self, selector: &Selector) -> FrameResult<Vec<usize>> {
        match selector {
            Selector::Position(p) => Ok(vec![*p]),
            Selector::Range(span) => span.resolve(self.len()),
            Selector::BoolMask(mask) => {
                if mask.len() != self.len() {
                    return Err(FrameError::index(format!(
                        "expected a mask of length {}, got {}",
                        self.len(),
                        mask.len()
                    )));
                }
                Ok(mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &keep)| keep.then_some(i))
                    .collect())
            }
            Selector::IndexList(positions) => positions
                .iter()
                .map(|&i| gather_position(i, self.len()))
                .collect(),
            Selector::Label(_) | Selector::LabelList(_) => Err(FrameError::index(
                "can't index a column with labels",
            )),
            Selector::Positions(_) => Err(FrameError::index(
                "can't index a column with a position collection",
            )),
            Selector::Unusable(message) => Err(FrameError::index(message.clone())),
        }
    }

    /// Gather the selected elements into a new column of the same dtype.
    ///
    /// The result always owns a fresh buffer.
    pub fn get(&self, selector: impl Into<Selector>) -> FrameResult<Column> {
        let positions = self.resolve(&selector.into())?;
        self.gather(&positions)
    }

    pub(crate) fn gather(&self, positions: &[usize]) -> FrameResult<Column> {
        let mut data = Vec::with_capacity(positions.len());
        for &p in positions {
            let value = self.data.get(p).ok_or_else(|| {
                FrameError::index(format!(
                    "position {p} out of range for length {}",
                    self.len()
                ))
            })?;
            data.push(value.clone());
        }
        Ok(Column::from_parts(data, self.dtype))
    }

    /// Assign into the selected positions.
    ///
    /// A scalar is coerced once and broadcast; a sequence is coerced
    /// element-wise and must then match the number of resolved positions.
    pub fn set(
        &mut self,
        selector: impl Into<Selector>,
        value: impl Into<Assign>,
    ) -> FrameResult<()> {
        let positions = self.resolve(&selector.into())?;
        for &p in &positions {
            if p >= self.len() {
                return Err(FrameError::index(format!(
                    "position {p} out of range for length {}",
                    self.len()
                )));
            }
        }
        match value.into() {
            Assign::Scalar(v) => {
                let coerced = coerce(&v, self.dtype, &self.policy)?;
                for p in positions {
                    self.data[p] = coerced.clone();
                }
            }
            Assign::Sequence(values) => {
                let mut coerced = Vec::with_capacity(values.len());
                for v in &values {
                    coerced.push(coerce(v, self.dtype, &self.policy)?);
                }
                if coerced.len() != positions.len() {
                    return Err(FrameError::SizeMismatch {
                        expected: positions.len(),
                        actual: coerced.len(),
                    });
                }
                for (p, v) in positions.into_iter().zip(coerced) {
                    self.data[p] = v;
                }
            }
        }
        Ok(())
    }

    /// Apply a binary operator element-wise against a column or a scalar.
    ///
    /// A column operand must match this column's length exactly; a scalar
    /// is broadcast. The result dtype is deduced from the first element of
    /// the result, with an empty result defaulting to float (compatibility
    /// behavior).
    pub fn binary<'a>(&self, op: BinaryOp, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        let data = match rhs.into() {
            Operand::Column(other) => {
                if self.len() != other.len() {
                    return Err(FrameError::SizeMismatch {
                        expected: self.len(),
                        actual: other.len(),
                    });
                }
                self.data
                    .iter()
                    .zip(&other.data)
                    .map(|(a, b)| ops::apply(op, a, b))
                    .collect::<FrameResult<Vec<_>>>()?
            }
            Operand::Scalar(scalar) => self
                .data
                .iter()
                .map(|a| ops::apply(op, a, &scalar))
                .collect::<FrameResult<Vec<_>>>()?,
        };
        let dtype = data.first().map(Value::data_type);
        // Re-run the checked constructor so a kernel that produced a mixed
        // sequence (e.g. integer pow with mixed exponent signs) still yields
        // a homogeneous column.
        Column::build(data, dtype.or(Some(DataType::Float64)), false, None)
    }

    /// Element-wise addition (`+`); concatenation for text columns.
    pub fn add<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Add, rhs)
    }

    /// Element-wise subtraction (`-`).
    pub fn sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Sub, rhs)
    }

    /// Element-wise multiplication (`*`).
    pub fn mul<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Mul, rhs)
    }

    /// Element-wise true division (`/`); numeric results are floats.
    pub fn div<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Div, rhs)
    }

    /// Element-wise floor division (`//`).
    pub fn floordiv<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::FloorDiv, rhs)
    }

    /// Element-wise modulo (`%`), sign following the divisor.
    pub fn rem<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Rem, rhs)
    }

    /// Element-wise exponentiation (`**`).
    pub fn pow<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Pow, rhs)
    }

    /// Element-wise AND (`&`): logical for bools, bitwise for ints.
    pub fn bitand<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::And, rhs)
    }

    /// Element-wise OR (`|`): logical for bools, bitwise for ints.
    pub fn bitor<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Or, rhs)
    }

    /// Element-wise XOR (`^`): logical for bools, bitwise for ints.
    pub fn bitxor<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Xor, rhs)
    }

    /// Element-wise equality (`==`); yields a boolean column.
    pub fn eq<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Eq, rhs)
    }

    /// Element-wise inequality (`!=`); yields a boolean column.
    pub fn ne<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Ne, rhs)
    }

    /// Element-wise less-than (`<`); yields a boolean column.
    pub fn lt<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Lt, rhs)
    }

    /// Element-wise less-than-or-equal (`<=`); yields a boolean column.
    pub fn le<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Le, rhs)
    }

    /// Element-wise greater-than (`>`); yields a boolean column.
    pub fn gt<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Gt, rhs)
    }

    /// Element-wise greater-than-or-equal (`>=`); yields a boolean column.
    pub fn ge<'a>(&self, rhs: impl Into<Operand<'a>>) -> FrameResult<Column> {
        self.binary(BinaryOp::Ge, rhs)
    }

    /// Minimum over the raw values; empty input is a domain error.
    ///
    /// NaN never wins a comparison, so NaN elements are skipped over unless
    /// the column holds nothing else.
    pub fn min(&self) -> FrameResult<Value> {
        self.extremum(std::cmp::Ordering::Less)
    }

    /// Maximum over the raw values; empty input is a domain error.
    pub fn max(&self) -> FrameResult<Value> {
        self.extremum(std::cmp::Ordering::Greater)
    }

    fn extremum(&self, wanted: std::cmp::Ordering) -> FrameResult<Value> {
        let mut iter = self.data.iter();
        let mut best = iter
            .next()
            .ok_or_else(|| FrameError::domain("not defined for an empty column"))?;
        for v in iter {
            if partial_order(v, best) == Some(wanted) {
                best = v;
            }
        }
        Ok(best.clone())
    }

    /// Arithmetic mean: sum divided by count.
    ///
    /// Defined only for numeric dtypes and non-empty columns.
    pub fn mean(&self) -> FrameResult<f64> {
        if !self.dtype.is_numeric() {
            return Err(FrameError::domain(format!(
                "not defined for a column of dtype {}",
                self.dtype
            )));
        }
        if self.is_empty() {
            return Err(FrameError::domain("not defined for an empty column"));
        }
        let sum: f64 = self.data.iter().filter_map(Value::as_f64).sum();
        Ok(sum / self.len() as f64)
    }

    /// Population standard deviation, computed from [`Column::mean`].
    pub fn std(&self) -> FrameResult<f64> {
        let mean = self.mean()?;
        let sum_sq: f64 = self
            .data
            .iter()
            .filter_map(Value::as_f64)
            .map(|v| (v - mean).powi(2))
            .sum();
        Ok((sum_sq / self.len() as f64).sqrt())
    }

    /// Nearest-rank-below percentile: sorts a copy and returns the element
    /// at `floor(rank × len)`. `rank` must lie strictly inside (0, 1).
    pub fn percentile(&self, rank: f64) -> FrameResult<Value> {
        if self.is_empty() {
            return Err(FrameError::domain("not defined for an empty column"));
        }
        if !(rank > 0.0 && rank < 1.0) {
            return Err(FrameError::domain("rank must be within (0, 1)"));
        }
        let sorted = self.sort();
        let idx = (rank * self.len() as f64) as usize;
        Ok(sorted.data[idx].clone())
    }

    /// Drop missing values: a float column keeps only elements that equal
    /// themselves (NaN fails self-equality); any other dtype is returned as
    /// an unmodified copy.
    pub fn dropna(&self) -> Column {
        if self.dtype != DataType::Float64 {
            return self.clone();
        }
        let data = self
            .data
            .iter()
            .filter(|v| !v.is_missing())
            .cloned()
            .collect();
        Column::from_parts(data, self.dtype)
    }

    /// A sorted copy, using the natural ordering of the dtype.
    pub fn sort(&self) -> Column {
        let mut out = self.clone();
        out.sort_in_place();
        out
    }

    /// Sort the column in place.
    pub fn sort_in_place(&mut self) {
        self.data.sort_by(value_ordering);
    }

    /// Extend with the values of `other`. Callers guarantee matching dtypes.
    pub(crate) fn extend_from(&mut self, other: &Column) {
        debug_assert_eq!(self.dtype, other.dtype);
        self.data.extend(other.data.iter().cloned());
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

impl<'a> IntoIterator for &'a Column {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

fn partial_order(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Int64(x), Value::Int64(y)) => Some(x.cmp(y)),
        (Value::Float64(x), Value::Float64(y)) => x.partial_cmp(y),
        (Value::Utf8(x), Value::Utf8(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total ordering used by sort: floats order by their IEEE total order so
/// the sort is deterministic even with NaN present.
fn value_ordering(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a, b) {
        (Value::Float64(x), Value::Float64(y)) => x.total_cmp(y),
        _ => partial_order(a, b).unwrap_or(std::cmp::Ordering::Equal),
    }
}
