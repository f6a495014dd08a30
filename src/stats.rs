//! Descriptive statistics over the numeric columns of a table.
//!
//! [`describe`] returns structured aggregate data; laying the numbers out
//! as padded text (terminal width, precision) is a presentation concern
//! that lives outside this crate.

use crate::column::Column;
use crate::error::FrameResult;
use crate::table::Table;
use crate::types::Value;

/// The aggregate labels, in the order [`ColumnSummary::values`] reports them.
pub const MEASURES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Aggregates for one numeric column, missing values excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    /// Column name, or a synthetic `f{i}` label for unnamed tables.
    pub name: String,
    /// Number of non-missing values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Minimum.
    pub min: f64,
    /// 25th percentile (nearest rank below).
    pub p25: f64,
    /// 50th percentile (nearest rank below).
    pub p50: f64,
    /// 75th percentile (nearest rank below).
    pub p75: f64,
    /// Maximum.
    pub max: f64,
}

impl ColumnSummary {
    /// The aggregates in [`MEASURES`] order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.p50,
            self.p75,
            self.max,
        ]
    }
}

/// Per-column descriptive statistics for a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// One entry per numeric column, in table order.
    pub columns: Vec<ColumnSummary>,
}

/// Compute descriptive statistics for every numeric column of `table`.
///
/// Non-numeric columns are skipped. Each selected column first drops its
/// missing values; a column with nothing left propagates the underlying
/// empty-input domain error rather than reporting zeros.
pub fn describe(table: &Table) -> FrameResult<Summary> {
    let mut columns = Vec::new();
    for (i, col) in table.cols().iter().enumerate() {
        if !col.dtype().is_numeric() {
            continue;
        }
        let name = match table.names() {
            Some(names) => names[i].clone(),
            None => format!("f{i}"),
        };
        columns.push(summarize(name, &col.dropna())?);
    }
    Ok(Summary { columns })
}

fn summarize(name: String, col: &Column) -> FrameResult<ColumnSummary> {
    Ok(ColumnSummary {
        name,
        count: col.len(),
        mean: col.mean()?,
        std: col.std()?,
        min: to_f64(col.min()?),
        p25: to_f64(col.percentile(0.25)?),
        p50: to_f64(col.percentile(0.50)?),
        p75: to_f64(col.percentile(0.75)?),
        max: to_f64(col.max()?),
    })
}

fn to_f64(value: Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}
