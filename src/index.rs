//! Unified selector model for columns and tables.
//!
//! Every indexing entry point resolves a [`Selector`] to a concrete ordered
//! list of positions. The selector is a closed tagged enum, so the
//! row-vs-column ambiguity in table indexing is an explicit, exhaustively
//! matched branch rather than open-ended type inspection.

use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::types::{DataType, Value};

/// A start/stop/step range resolved against a length, with the semantics of
/// a host-language slice: negative bounds count from the end, bounds are
/// clamped rather than rejected, and a negative step walks backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First position; defaults to the start of the walk.
    pub start: Option<i64>,
    /// Exclusive end position; defaults to the end of the walk.
    pub stop: Option<i64>,
    /// Stride; defaults to 1. Zero is an indexing error.
    pub step: Option<i64>,
}

impl Span {
    /// Range over everything.
    pub fn all() -> Self {
        Self {
            start: None,
            stop: None,
            step: None,
        }
    }

    /// Range with explicit bounds and unit step.
    pub fn new(start: impl Into<Option<i64>>, stop: impl Into<Option<i64>>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            step: None,
        }
    }

    /// Range with explicit bounds and stride.
    pub fn with_step(
        start: impl Into<Option<i64>>,
        stop: impl Into<Option<i64>>,
        step: i64,
    ) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            step: Some(step),
        }
    }

    /// Resolve to concrete positions against a sequence of length `len`.
    pub(crate) fn resolve(&self, len: usize) -> FrameResult<Vec<usize>> {
        let len = len as i64;
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(FrameError::index("span step cannot be zero"));
        }

        let adjust = |idx: i64| if idx < 0 { idx + len } else { idx };

        let (start, stop) = if step > 0 {
            let start = adjust(self.start.unwrap_or(0)).clamp(0, len);
            let stop = adjust(self.stop.unwrap_or(len)).clamp(0, len);
            (start, stop)
        } else {
            let start = adjust(self.start.unwrap_or(len - 1)).clamp(-1, len - 1);
            // No stop means "walk past the first element"; an explicit
            // negative stop still counts from the end first.
            let stop = match self.stop {
                None => -1,
                Some(s) => adjust(s).clamp(-1, len - 1),
            };
            (start, stop)
        };

        let mut out = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            out.push(i as usize);
            i += step;
        }
        Ok(out)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(r: std::ops::Range<usize>) -> Self {
        Span::new(r.start as i64, r.end as i64)
    }
}

impl From<std::ops::RangeFrom<usize>> for Span {
    fn from(r: std::ops::RangeFrom<usize>) -> Self {
        Span::new(r.start as i64, None)
    }
}

impl From<std::ops::RangeTo<usize>> for Span {
    fn from(r: std::ops::RangeTo<usize>) -> Self {
        Span::new(None, r.end as i64)
    }
}

impl From<std::ops::RangeFull> for Span {
    fn from(_: std::ops::RangeFull) -> Self {
        Span::all()
    }
}

/// A selector accepted by the unified indexing entry points.
///
/// Columns accept positional forms (`Position`, `Range`, `BoolMask`,
/// `IndexList`); tables additionally accept label forms and decide the
/// addressed axis from the variant (see `Table::get`).
#[derive(Debug, Clone)]
pub enum Selector {
    /// A single position.
    Position(usize),
    /// A contiguous (possibly strided) range of positions.
    Range(Span),
    /// A single column label.
    Label(String),
    /// Element/row mask from a boolean column; true marks inclusion.
    BoolMask(Vec<bool>),
    /// Gather positions from an integer column, in the order given.
    /// Negative positions count from the end.
    IndexList(Vec<i64>),
    /// Column labels from a text column or an explicit list.
    LabelList(Vec<String>),
    /// An explicit ordered collection of column positions.
    Positions(Vec<usize>),
    /// A selector kind that cannot address anything; resolution reports the
    /// carried description as an indexing error.
    Unusable(String),
}

impl From<usize> for Selector {
    fn from(p: usize) -> Self {
        Selector::Position(p)
    }
}

impl From<Span> for Selector {
    fn from(s: Span) -> Self {
        Selector::Range(s)
    }
}

impl From<std::ops::Range<usize>> for Selector {
    fn from(r: std::ops::Range<usize>) -> Self {
        Selector::Range(r.into())
    }
}

impl From<std::ops::RangeFrom<usize>> for Selector {
    fn from(r: std::ops::RangeFrom<usize>) -> Self {
        Selector::Range(r.into())
    }
}

impl From<std::ops::RangeTo<usize>> for Selector {
    fn from(r: std::ops::RangeTo<usize>) -> Self {
        Selector::Range(r.into())
    }
}

impl From<std::ops::RangeFull> for Selector {
    fn from(r: std::ops::RangeFull) -> Self {
        Selector::Range(r.into())
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Label(name.to_owned())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Label(name)
    }
}

impl From<Vec<usize>> for Selector {
    fn from(positions: Vec<usize>) -> Self {
        Selector::Positions(positions)
    }
}

impl From<Vec<String>> for Selector {
    fn from(labels: Vec<String>) -> Self {
        Selector::LabelList(labels)
    }
}

impl From<Vec<&str>> for Selector {
    fn from(labels: Vec<&str>) -> Self {
        Selector::LabelList(labels.into_iter().map(str::to_owned).collect())
    }
}

impl From<&Column> for Selector {
    fn from(col: &Column) -> Self {
        match col.dtype() {
            DataType::Bool => Selector::BoolMask(
                col.values()
                    .iter()
                    .map(|v| matches!(v, Value::Bool(true)))
                    .collect(),
            ),
            DataType::Int64 => Selector::IndexList(
                col.values()
                    .iter()
                    .map(|v| match v {
                        Value::Int64(i) => *i,
                        _ => 0,
                    })
                    .collect(),
            ),
            DataType::Utf8 => Selector::LabelList(
                col.values().iter().map(|v| v.to_string()).collect(),
            ),
            DataType::Float64 => {
                Selector::Unusable("can't index with a column of dtype float".to_owned())
            }
        }
    }
}

impl From<Column> for Selector {
    fn from(col: Column) -> Self {
        Selector::from(&col)
    }
}

/// Resolve a signed gather position against a length, counting negative
/// positions from the end.
pub(crate) fn gather_position(idx: i64, len: usize) -> FrameResult<usize> {
    let adjusted = if idx < 0 { idx + len as i64 } else { idx };
    if adjusted < 0 || adjusted >= len as i64 {
        return Err(FrameError::index(format!(
            "position {idx} out of range for length {len}"
        )));
    }
    Ok(adjusted as usize)
}
