//! CSV ingestion into a [`Table`].
//!
//! Parsing is row-by-row: skip rows, optionally consume a header, fix the
//! field count from the first data row, accumulate raw text per column, and
//! hand each text column to [`Column::from_text`] for dtype inference with
//! any per-column override applied.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use encoding_rs::{Encoding, UTF_8};

use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::observe::{severity_for_error, ReadContext, ReadObserver, ReadStats, Severity};
use crate::table::Table;
use crate::types::DataType;

/// Key addressing one column of a dtype override map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// Address by position.
    Position(usize),
    /// Address by header/explicit name.
    Name(String),
}

/// Per-column dtype overrides for CSV ingestion.
///
/// Resolution is by position first, then by name.
#[derive(Debug, Clone, PartialEq)]
pub enum DtypeSpec {
    /// One dtype applied to every column.
    All(DataType),
    /// Dtypes for individual columns; unlisted columns infer normally.
    ByColumn(HashMap<ColumnKey, DataType>),
}

impl DtypeSpec {
    fn resolve(&self, position: usize, name: Option<&str>) -> Option<DataType> {
        match self {
            DtypeSpec::All(dtype) => Some(*dtype),
            DtypeSpec::ByColumn(map) => map
                .get(&ColumnKey::Position(position))
                .or_else(|| name.and_then(|n| map.get(&ColumnKey::Name(n.to_owned()))))
                .copied(),
        }
    }
}

/// Options controlling CSV ingestion.
///
/// Use [`Default`] for common cases: comma-delimited, UTF-8, header row.
#[derive(Clone)]
pub struct CsvOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Whether the first (post-skip) row is a header. Mutually exclusive
    /// with `names`.
    pub header: bool,
    /// Explicit column names, for headerless input.
    pub names: Option<Vec<String>>,
    /// Per-column dtype overrides; columns without one infer from text.
    pub dtype: Option<DtypeSpec>,
    /// Number of rows to skip before the header (if any).
    pub skiprows: usize,
    /// Maximum number of data rows to read.
    pub nrows: Option<usize>,
    /// Text encoding of path-based input.
    pub encoding: &'static Encoding,
    /// Optional observer for read outcomes.
    pub observer: Option<Arc<dyn ReadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header: true,
            names: None,
            dtype: None,
            skiprows: 0,
            nrows: None,
            encoding: UTF_8,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

impl fmt::Debug for CsvOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvOptions")
            .field("delimiter", &(self.delimiter as char))
            .field("header", &self.header)
            .field("names", &self.names)
            .field("dtype", &self.dtype)
            .field("skiprows", &self.skiprows)
            .field("nrows", &self.nrows)
            .field("encoding", &self.encoding.name())
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Read a CSV file into a [`Table`].
///
/// The file is decoded with `options.encoding` first, then parsed. When an
/// observer is configured this reports `on_success` with row/column stats,
/// `on_failure` with a computed severity, and `on_alert` when that severity
/// meets `options.alert_at_or_above`.
///
/// ```no_run
/// use typed_frame::csv::{read_csv, CsvOptions};
///
/// # fn main() -> typed_frame::FrameResult<()> {
/// let table = read_csv("data.csv", &CsvOptions::default())?;
/// println!("rows={}", table.nrows());
/// # Ok(())
/// # }
/// ```
pub fn read_csv(path: impl AsRef<Path>, options: &CsvOptions) -> FrameResult<Table> {
    let path = path.as_ref();
    let result = read_path(path, options);

    if let Some(observer) = options.observer.as_ref() {
        let ctx = ReadContext {
            path: path.to_path_buf(),
        };
        match &result {
            Ok(table) => observer.on_success(
                &ctx,
                ReadStats {
                    rows: table.nrows(),
                    columns: table.ncols(),
                },
            ),
            Err(error) => {
                let severity = severity_for_error(error);
                observer.on_failure(&ctx, severity, error);
                if severity >= options.alert_at_or_above {
                    observer.on_alert(&ctx, severity, error);
                }
            }
        }
    }

    result
}

fn read_path(path: &Path, options: &CsvOptions) -> FrameResult<Table> {
    let bytes = std::fs::read(path)?;
    let (text, _, _) = options.encoding.decode(&bytes);
    read_csv_from_reader(text.as_bytes(), options)
}

/// Read CSV data from an already-decoded (UTF-8) reader.
pub fn read_csv_from_reader<R: Read>(reader: R, options: &CsvOptions) -> FrameResult<Table> {
    if options.names.is_some() && options.header {
        return Err(FrameError::schema("'names' and 'header' are incompatible"));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = rdr.records();

    for _ in 0..options.skiprows {
        match records.next() {
            Some(record) => {
                record?;
            }
            None => return Err(FrameError::schema("csv input ended while skipping rows")),
        }
    }

    let names: Option<Vec<String>> = if options.header {
        match records.next() {
            Some(record) => Some(record?.iter().map(str::to_owned).collect()),
            None => return Err(FrameError::schema("csv input ended before the header row")),
        }
    } else {
        options.names.clone()
    };

    // The first data row fixes the field count; the nrows cap is checked
    // before the shape check, so a capped read never trips on rows past it.
    let mut cells: Vec<Vec<String>> = Vec::new();
    for (row_i, record) in records.enumerate() {
        let record = record?;
        if row_i == 0 {
            cells = vec![Vec::new(); record.len()];
        }
        if options.nrows.is_some_and(|cap| row_i == cap) {
            break;
        }
        if record.len() != cells.len() {
            return Err(FrameError::Structure {
                row: options.skiprows + row_i + usize::from(options.header),
            });
        }
        for (i, field) in record.iter().enumerate() {
            cells[i].push(field.to_owned());
        }
    }

    // No data rows: the header (or explicit names) still defines the shape.
    if cells.is_empty() {
        if let Some(names) = &names {
            cells = vec![Vec::new(); names.len()];
        }
    }

    let mut cols = Vec::with_capacity(cells.len());
    for (position, raw) in cells.into_iter().enumerate() {
        let name = names
            .as_ref()
            .and_then(|names| names.get(position))
            .map(String::as_str);
        let dtype = options
            .dtype
            .as_ref()
            .and_then(|spec| spec.resolve(position, name));
        cols.push(Column::from_text(raw, dtype)?);
    }

    Table::new(cols, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn headerless_read_with_explicit_names() {
        let input = "1,a\n2,b\n";
        let options = CsvOptions {
            header: false,
            names: Some(vec!["id".into(), "tag".into()]),
            ..Default::default()
        };
        let table = read_csv_from_reader(input.as_bytes(), &options).unwrap();
        assert_eq!(table.names().unwrap(), &["id".to_string(), "tag".to_string()]);
        assert_eq!(table.nrows(), 2);
        assert_eq!(
            table.get("id").unwrap().into_column().unwrap().values(),
            &[Value::Int64(1), Value::Int64(2)]
        );
    }

    #[test]
    fn names_and_header_are_mutually_exclusive() {
        let options = CsvOptions {
            names: Some(vec!["x".into()]),
            ..Default::default()
        };
        let err = read_csv_from_reader("x\n1\n".as_bytes(), &options).unwrap_err();
        assert!(matches!(err, FrameError::SchemaMismatch { .. }));
    }

    #[test]
    fn skiprows_skips_before_the_header() {
        let input = "junk line\nx,y\n1,2\n";
        let options = CsvOptions {
            skiprows: 1,
            ..Default::default()
        };
        let table = read_csv_from_reader(input.as_bytes(), &options).unwrap();
        assert_eq!(table.names().unwrap(), &["x".to_string(), "y".to_string()]);
        assert_eq!(table.nrows(), 1);
    }

    #[test]
    fn nrows_caps_data_rows() {
        let input = "x\n1\n2\n3\n";
        let options = CsvOptions {
            nrows: Some(2),
            ..Default::default()
        };
        let table = read_csv_from_reader(input.as_bytes(), &options).unwrap();
        assert_eq!(table.nrows(), 2);
    }

    #[test]
    fn ragged_row_reports_its_position() {
        let input = "x,y\n1,2\n3\n";
        let err = read_csv_from_reader(input.as_bytes(), &CsvOptions::default()).unwrap_err();
        // data row 1, plus one for the header
        assert!(matches!(err, FrameError::Structure { row: 2 }));
    }

    #[test]
    fn ragged_row_position_accounts_for_skipped_rows() {
        let input = "junk\nx,y\n1,2\n3\n";
        let options = CsvOptions {
            skiprows: 1,
            ..Default::default()
        };
        let err = read_csv_from_reader(input.as_bytes(), &options).unwrap_err();
        assert!(matches!(err, FrameError::Structure { row: 3 }));
    }

    #[test]
    fn dtype_override_applies_to_all_columns() {
        let input = "x,y\n1,2\n";
        let options = CsvOptions {
            dtype: Some(DtypeSpec::All(DataType::Float64)),
            ..Default::default()
        };
        let table = read_csv_from_reader(input.as_bytes(), &options).unwrap();
        assert_eq!(
            table.get("x").unwrap().into_column().unwrap().dtype(),
            DataType::Float64
        );
        assert_eq!(
            table.get("y").unwrap().into_column().unwrap().dtype(),
            DataType::Float64
        );
    }

    #[test]
    fn dtype_override_by_name_and_position() {
        let input = "x,y,z\n1,2,3\n";
        let mut map = HashMap::new();
        map.insert(ColumnKey::Name("x".into()), DataType::Float64);
        map.insert(ColumnKey::Position(1), DataType::Utf8);
        let options = CsvOptions {
            dtype: Some(DtypeSpec::ByColumn(map)),
            ..Default::default()
        };
        let table = read_csv_from_reader(input.as_bytes(), &options).unwrap();
        let dtypes: Vec<DataType> = table.cols().iter().map(Column::dtype).collect();
        assert_eq!(
            dtypes,
            vec![DataType::Float64, DataType::Utf8, DataType::Int64]
        );
    }

    #[test]
    fn custom_delimiter() {
        let input = "x;y\n1;2\n";
        let options = CsvOptions {
            delimiter: b';',
            ..Default::default()
        };
        let table = read_csv_from_reader(input.as_bytes(), &options).unwrap();
        assert_eq!(table.ncols(), 2);
        assert_eq!(
            table.get("y").unwrap().into_column().unwrap().values(),
            &[Value::Int64(2)]
        );
    }

    #[test]
    fn header_without_data_yields_empty_columns() {
        let table = read_csv_from_reader("x,y\n".as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(table.ncols(), 2);
        assert_eq!(table.nrows(), 0);
        assert_eq!(
            table.get("x").unwrap().into_column().unwrap().dtype(),
            DataType::Float64
        );
    }
}
