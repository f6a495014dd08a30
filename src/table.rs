//! Table of equal-length typed columns with optional name addressing.
//!
//! A [`Table`] composes [`Column`]s and never inspects scalar values
//! directly: every row operation decomposes into column-level gathers that
//! are reassembled into a new table. One selector entry point serves both
//! axes; the addressed axis is decided by the selector variant (and, for
//! column-valued selectors, the selector column's dtype).

use std::fmt;

use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::index::{gather_position, Selector};
use crate::ops::BinaryOp;
use crate::stats::{self, Summary};
use crate::types::{DataType, Value};

/// Ordered collection of equal-length columns, optionally paired with a
/// bijective name→position mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    cols: Vec<Column>,
    nrows: usize,
    names: Option<Vec<String>>,
}

/// Which axis a resolved table selector addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Columns,
    Rows,
}

/// Result of a table selection: a single column for a singleton column
/// selection, otherwise a new table.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Exactly one column was selected.
    Column(Column),
    /// Several columns, or a row subset of every column.
    Table(Table),
}

impl Selection {
    /// Unwrap a single-column selection.
    pub fn into_column(self) -> FrameResult<Column> {
        match self {
            Selection::Column(col) => Ok(col),
            Selection::Table(_) => Err(FrameError::index(
                "selection produced a table, not a single column",
            )),
        }
    }

    /// Unwrap a table selection.
    pub fn into_table(self) -> FrameResult<Table> {
        match self {
            Selection::Table(table) => Ok(table),
            Selection::Column(_) => Err(FrameError::index(
                "selection produced a single column, not a table",
            )),
        }
    }
}

impl Table {
    /// Create a table from columns and optional names.
    ///
    /// All columns must share one length; names, when given, must pair one
    /// unique name with each column.
    pub fn new(cols: Vec<Column>, names: Option<Vec<String>>) -> FrameResult<Self> {
        let nrows = cols.first().map(Column::len).unwrap_or(0);
        for col in &cols {
            if col.len() != nrows {
                return Err(FrameError::SizeMismatch {
                    expected: nrows,
                    actual: col.len(),
                });
            }
        }
        if let Some(names) = &names {
            if names.len() != cols.len() {
                return Err(FrameError::schema(format!(
                    "got {} names for {} columns",
                    names.len(),
                    cols.len()
                )));
            }
            for (i, name) in names.iter().enumerate() {
                if names[..i].contains(name) {
                    return Err(FrameError::schema(format!("duplicate column name '{name}'")));
                }
            }
        }
        Ok(Self { cols, nrows, names })
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.cols.len()
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// The column names, if the table has any.
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Borrow the columns in order.
    pub fn cols(&self) -> &[Column] {
        &self.cols
    }

    /// The table's column labels as a column: the names when present,
    /// ordinal positions otherwise.
    pub fn columns(&self) -> Column {
        match &self.names {
            Some(names) => Column::from_parts(
                names.iter().map(|n| Value::Utf8(n.clone())).collect(),
                DataType::Utf8,
            ),
            None => Column::from_parts(
                (0..self.ncols() as i64).map(Value::Int64).collect(),
                DataType::Int64,
            ),
        }
    }

    fn name_position(&self, name: &str) -> FrameResult<usize> {
        self.names
            .as_ref()
            .and_then(|names| names.iter().position(|n| n == name))
            .ok_or_else(|| FrameError::index(format!("unknown column label '{name}'")))
    }

    /// Resolve a selector to an axis tag plus positions.
    ///
    /// Positions and spans address columns; labels address columns by name;
    /// a column selector addresses rows when boolean (mask) or integer
    /// (gather) and columns when text (labels); explicit collections of
    /// positions or labels address columns.
    fn resolve(&self, selector: &Selector) -> FrameResult<(Axis, Vec<usize>)> {
        match selector {
            Selector::Position(p) => Ok((Axis::Columns, vec![*p])),
            Selector::Range(span) => Ok((Axis::Columns, span.resolve(self.ncols())?)),
            Selector::Label(name) => Ok((Axis::Columns, vec![self.name_position(name)?])),
            Selector::BoolMask(mask) => {
                if mask.len() != self.nrows {
                    return Err(FrameError::index(format!(
                        "expected a mask of length {}, got {}",
                        self.nrows,
                        mask.len()
                    )));
                }
                Ok((
                    Axis::Rows,
                    mask.iter()
                        .enumerate()
                        .filter_map(|(i, &keep)| keep.then_some(i))
                        .collect(),
                ))
            }
            Selector::IndexList(positions) => Ok((
                Axis::Rows,
                positions
                    .iter()
                    .map(|&i| gather_position(i, self.nrows))
                    .collect::<FrameResult<Vec<_>>>()?,
            )),
            Selector::LabelList(labels) => Ok((
                Axis::Columns,
                labels
                    .iter()
                    .map(|name| self.name_position(name))
                    .collect::<FrameResult<Vec<_>>>()?,
            )),
            Selector::Positions(positions) => Ok((Axis::Columns, positions.clone())),
            Selector::Unusable(message) => Err(FrameError::index(message.clone())),
        }
    }

    /// Select columns or rows through the unified selector.
    ///
    /// A singleton column selection yields [`Selection::Column`]; everything
    /// else yields a new [`Selection::Table`] with names preserved. Row
    /// selections rebuild every column through a gather.
    pub fn get(&self, selector: impl Into<Selector>) -> FrameResult<Selection> {
        let (axis, positions) = self.resolve(&selector.into())?;
        match axis {
            Axis::Columns => {
                if positions.len() == 1 {
                    return Ok(Selection::Column(self.column_at(positions[0])?.clone()));
                }
                let mut cols = Vec::with_capacity(positions.len());
                for &p in &positions {
                    cols.push(self.column_at(p)?.clone());
                }
                let names = self.names.as_ref().map(|names| {
                    positions.iter().map(|&p| names[p].clone()).collect()
                });
                Table::new(cols, names).map(Selection::Table)
            }
            Axis::Rows => self.take_rows(&positions).map(Selection::Table),
        }
    }

    fn column_at(&self, position: usize) -> FrameResult<&Column> {
        self.cols.get(position).ok_or_else(|| {
            FrameError::index(format!(
                "column position {position} out of range for {} columns",
                self.ncols()
            ))
        })
    }

    fn take_rows(&self, positions: &[usize]) -> FrameResult<Table> {
        let mut cols = Vec::with_capacity(self.ncols());
        for col in &self.cols {
            cols.push(col.gather(positions)?);
        }
        Ok(Table {
            cols,
            nrows: positions.len(),
            names: self.names.clone(),
        })
    }

    /// Replace a whole column, addressed by position or label.
    ///
    /// The replacement must match the table's row count; it is moved into
    /// the table, so no outside reference can alias it afterwards.
    pub fn set(&mut self, selector: impl Into<Selector>, column: Column) -> FrameResult<()> {
        let position = match selector.into() {
            Selector::Position(p) => p,
            Selector::Label(name) => self.name_position(&name)?,
            _ => {
                return Err(FrameError::index(
                    "only whole-column assignment by position or label is supported",
                ));
            }
        };
        if position >= self.ncols() {
            return Err(FrameError::index(format!(
                "column position {position} out of range for {} columns",
                self.ncols()
            )));
        }
        if column.len() != self.nrows {
            return Err(FrameError::SizeMismatch {
                expected: self.nrows,
                actual: column.len(),
            });
        }
        self.cols[position] = column;
        Ok(())
    }

    /// Append another table's rows in place.
    ///
    /// Requires an identical name mapping and identical per-column dtypes;
    /// anything else is a schema mismatch.
    pub fn append(&mut self, other: &Table) -> FrameResult<()> {
        if self.names != other.names {
            return Err(FrameError::schema("incompatible column names"));
        }
        if self.ncols() != other.ncols() {
            return Err(FrameError::schema(format!(
                "got {} columns, expected {}",
                other.ncols(),
                self.ncols()
            )));
        }
        for (a, b) in self.cols.iter().zip(&other.cols) {
            if a.dtype() != b.dtype() {
                return Err(FrameError::schema(format!(
                    "incompatible column dtypes: {} vs {}",
                    a.dtype(),
                    b.dtype()
                )));
            }
        }
        for (a, b) in self.cols.iter_mut().zip(&other.cols) {
            a.extend_from(b);
        }
        self.nrows += other.nrows;
        Ok(())
    }

    /// Drop every row holding a missing value.
    ///
    /// Float columns contribute their self-equality masks, combined with
    /// logical AND; non-float columns do not constrain the result. A table
    /// with no float columns is returned unfiltered.
    pub fn dropna(&self) -> FrameResult<Table> {
        let mut combined: Option<Column> = None;
        for col in &self.cols {
            if col.dtype() != DataType::Float64 {
                continue;
            }
            let mask = col.binary(BinaryOp::Eq, col)?;
            combined = Some(match combined {
                Some(acc) => acc.binary(BinaryOp::And, &mask)?,
                None => mask,
            });
        }
        match combined {
            Some(mask) => self.get(&mask)?.into_table(),
            None => Ok(self.clone()),
        }
    }

    /// Replace every column by its missing-value mask: true exactly where a
    /// float value is NaN, all-false for other dtypes.
    pub fn isna(&self) -> FrameResult<Table> {
        let mut cols = Vec::with_capacity(self.ncols());
        for col in &self.cols {
            cols.push(col.binary(BinaryOp::Ne, col)?);
        }
        Ok(Table {
            cols,
            nrows: self.nrows,
            names: self.names.clone(),
        })
    }

    /// Descriptive statistics over the numeric columns; see [`stats::describe`].
    pub fn describe(&self) -> FrameResult<Summary> {
        stats::describe(self)
    }

    pub(crate) fn row(&self, position: usize) -> FrameResult<Vec<Value>> {
        self.cols
            .iter()
            .map(|col| col.get(position)?.item())
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table, ncols={}, nrows={}:", self.ncols(), self.nrows)?;
        match &self.names {
            Some(names) => writeln!(f, "{}", names.join(", "))?,
            None => writeln!(f, "no column names")?,
        }
        let preview = self.nrows.min(10);
        for i in 0..preview {
            if let Ok(row) = self.row(i) {
                let cells: Vec<String> = row.iter().map(Value::to_string).collect();
                writeln!(f, "{}", cells.join(", "))?;
            }
        }
        if preview < self.nrows {
            writeln!(f, ". . .")?;
            if let Ok(row) = self.row(self.nrows - 1) {
                let cells: Vec<String> = row.iter().map(Value::to_string).collect();
                writeln!(f, "{}", cells.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_col(values: &[i64]) -> Column {
        Column::new(values.iter().map(|&v| Value::Int64(v)), None).unwrap()
    }

    fn float_col(values: &[f64]) -> Column {
        Column::new(values.iter().map(|&v| Value::Float64(v)), None).unwrap()
    }

    fn named_ab() -> Table {
        Table::new(
            vec![int_col(&[1, 2, 3]), int_col(&[4, 5, 6])],
            Some(vec!["a".into(), "b".into()]),
        )
        .unwrap()
    }

    #[test]
    fn construction_validates_lengths_and_names() {
        let err = Table::new(vec![int_col(&[1, 2]), int_col(&[1])], None).unwrap_err();
        assert!(matches!(err, FrameError::SizeMismatch { .. }));

        let err = Table::new(
            vec![int_col(&[1]), int_col(&[2])],
            Some(vec!["x".into(), "x".into()]),
        )
        .unwrap_err();
        assert!(matches!(err, FrameError::SchemaMismatch { .. }));

        let err = Table::new(vec![int_col(&[1])], Some(vec!["x".into(), "y".into()]))
            .unwrap_err();
        assert!(matches!(err, FrameError::SchemaMismatch { .. }));
    }

    #[test]
    fn label_selects_a_single_column() {
        let table = named_ab();
        let col = table.get("a").unwrap().into_column().unwrap();
        assert_eq!(col.values(), &[Value::Int64(1), Value::Int64(2), Value::Int64(3)]);
    }

    #[test]
    fn label_list_selects_a_table() {
        let table = named_ab();
        let out = table.get(vec!["b", "a"]).unwrap().into_table().unwrap();
        assert_eq!(out.names().unwrap(), &["b".to_string(), "a".to_string()]);
        assert_eq!(out.cols()[0].values()[0], Value::Int64(4));
    }

    #[test]
    fn bool_mask_selects_rows() {
        let table = named_ab();
        let mask = table.get("a").unwrap().into_column().unwrap().gt(1i64).unwrap();
        let filtered = table.get(&mask).unwrap().into_table().unwrap();
        assert_eq!(filtered.nrows(), 2);
        assert_eq!(
            filtered.get("a").unwrap().into_column().unwrap().values(),
            &[Value::Int64(2), Value::Int64(3)]
        );
        assert_eq!(
            filtered.get("b").unwrap().into_column().unwrap().values(),
            &[Value::Int64(5), Value::Int64(6)]
        );
        assert_eq!(filtered.names(), table.names());
    }

    #[test]
    fn int_column_gathers_rows() {
        let table = named_ab();
        let picker = int_col(&[2, 0]);
        let out = table.get(&picker).unwrap().into_table().unwrap();
        assert_eq!(out.nrows(), 2);
        assert_eq!(
            out.get("a").unwrap().into_column().unwrap().values(),
            &[Value::Int64(3), Value::Int64(1)]
        );
    }

    #[test]
    fn text_column_selects_columns_by_label() {
        let table = named_ab();
        let labels = Column::from_text(vec!["b".into()], None).unwrap();
        assert_eq!(labels.dtype(), DataType::Utf8);
        let col = table.get(&labels).unwrap().into_column().unwrap();
        assert_eq!(col.values(), &[Value::Int64(4), Value::Int64(5), Value::Int64(6)]);
    }

    #[test]
    fn float_column_selector_is_an_index_error() {
        let table = named_ab();
        let bad = float_col(&[1.0, 2.0, 3.0]);
        assert!(matches!(table.get(&bad).unwrap_err(), FrameError::Index { .. }));
    }

    #[test]
    fn mask_length_must_match_row_count() {
        let table = named_ab();
        let mask = Column::new(vec![Value::Bool(true)], None).unwrap();
        assert!(matches!(table.get(&mask).unwrap_err(), FrameError::Index { .. }));
    }

    #[test]
    fn set_replaces_whole_columns_only() {
        let mut table = named_ab();
        table.set("a", int_col(&[9, 9, 9])).unwrap();
        assert_eq!(
            table.get("a").unwrap().into_column().unwrap().values(),
            &[Value::Int64(9), Value::Int64(9), Value::Int64(9)]
        );

        let err = table.set("a", int_col(&[1])).unwrap_err();
        assert!(matches!(err, FrameError::SizeMismatch { .. }));

        let err = table.set(0..2, int_col(&[1, 2, 3])).unwrap_err();
        assert!(matches!(err, FrameError::Index { .. }));
    }

    #[test]
    fn append_requires_matching_schema() {
        let mut table = named_ab();
        let other = named_ab();
        table.append(&other).unwrap();
        assert_eq!(table.nrows(), 6);
        assert_eq!(
            table.get("a").unwrap().into_column().unwrap().values(),
            &[
                Value::Int64(1),
                Value::Int64(2),
                Value::Int64(3),
                Value::Int64(1),
                Value::Int64(2),
                Value::Int64(3)
            ]
        );

        let renamed = Table::new(
            vec![int_col(&[1]), int_col(&[2])],
            Some(vec!["a".into(), "c".into()]),
        )
        .unwrap();
        assert!(matches!(
            table.append(&renamed).unwrap_err(),
            FrameError::SchemaMismatch { .. }
        ));

        let retyped = Table::new(
            vec![float_col(&[1.0]), int_col(&[2])],
            Some(vec!["a".into(), "b".into()]),
        )
        .unwrap();
        assert!(matches!(
            table.append(&retyped).unwrap_err(),
            FrameError::SchemaMismatch { .. }
        ));
    }

    #[test]
    fn dropna_filters_on_float_columns_only() {
        let table = Table::new(
            vec![
                float_col(&[1.0, f64::NAN, 3.0]),
                int_col(&[10, 20, 30]),
            ],
            Some(vec!["x".into(), "y".into()]),
        )
        .unwrap();
        let clean = table.dropna().unwrap();
        assert_eq!(clean.nrows(), 2);
        assert_eq!(
            clean.get("y").unwrap().into_column().unwrap().values(),
            &[Value::Int64(10), Value::Int64(30)]
        );

        let no_floats = named_ab();
        let untouched = no_floats.dropna().unwrap();
        assert_eq!(untouched.nrows(), 3);
    }

    #[test]
    fn isna_marks_nan_only() {
        let table = Table::new(
            vec![float_col(&[1.0, f64::NAN]), int_col(&[1, 2])],
            Some(vec!["x".into(), "y".into()]),
        )
        .unwrap();
        let mask = table.isna().unwrap();
        assert_eq!(
            mask.get("x").unwrap().into_column().unwrap().values(),
            &[Value::Bool(false), Value::Bool(true)]
        );
        assert_eq!(
            mask.get("y").unwrap().into_column().unwrap().values(),
            &[Value::Bool(false), Value::Bool(false)]
        );
    }

    #[test]
    fn columns_accessor_reports_labels() {
        let table = named_ab();
        assert_eq!(
            table.columns().values(),
            &[Value::Utf8("a".into()), Value::Utf8("b".into())]
        );

        let unnamed = Table::new(vec![int_col(&[1]), int_col(&[2])], None).unwrap();
        assert_eq!(
            unnamed.columns().values(),
            &[Value::Int64(0), Value::Int64(1)]
        );
    }

    #[test]
    fn empty_label_list_yields_an_empty_table() {
        let table = named_ab();
        let out = table.get(Vec::<String>::new()).unwrap().into_table().unwrap();
        assert_eq!(out.ncols(), 0);
        assert_eq!(out.nrows(), 0);
    }
}
