//! `typed-frame` is a small typed tabular-data engine: an ordered,
//! homogeneously-typed [`Column`] and a [`Table`] built from equal-length
//! columns, with unified positional/label/mask indexing, dtype inference
//! and coercion, broadcasting operators, CSV ingestion, and descriptive
//! statistics over numeric columns.
//!
//! ## Data model
//!
//! A [`Column`] stores [`types::Value`]s of one declared [`types::DataType`]
//! drawn from a closed set:
//!
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Utf8`]
//!
//! Missing data is `Float64(NaN)`; the `dropna`/`isna` family keys on
//! self-(in)equality, which only NaN fails.
//!
//! ## Quick example: columns and tables
//!
//! ```rust
//! use typed_frame::{Column, Table};
//! use typed_frame::types::Value;
//!
//! # fn main() -> typed_frame::FrameResult<()> {
//! let a = Column::new((1..=3).map(Value::Int64), None)?;
//! let b = Column::new((4..=6).map(Value::Int64), None)?;
//! let table = Table::new(vec![a, b], Some(vec!["a".into(), "b".into()]))?;
//!
//! // One entry point resolves labels to columns and masks to rows.
//! let a = table.get("a")?.into_column()?;
//! let filtered = table.get(&a.gt(1i64)?)?.into_table()?;
//! assert_eq!(filtered.nrows(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: CSV ingestion
//!
//! Column dtypes are inferred from the first cell (integer, then float,
//! then text) unless overridden per column:
//!
//! ```no_run
//! use typed_frame::csv::{read_csv, CsvOptions};
//!
//! # fn main() -> typed_frame::FrameResult<()> {
//! let table = read_csv("data.csv", &CsvOptions::default())?;
//! let summary = table.describe()?;
//! for col in &summary.columns {
//!     println!("{}: mean={} std={}", col.name, col.mean, col.std);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`column`]: the typed column container and its operators/aggregates
//! - [`table`]: the table and its unified row/column indexing
//! - [`csv`]: CSV ingestion with per-column dtype overrides
//! - [`stats`]: descriptive statistics as structured data
//! - [`index`]: selectors and spans shared by both containers
//! - [`ops`]: binary operator kernels and broadcasting operands
//! - [`observe`]: read-outcome observer hooks
//! - [`types`]: dtypes, scalar values, and coercion policy
//! - [`error`]: the crate-wide error type

pub mod column;
pub mod csv;
pub mod error;
pub mod index;
pub mod observe;
pub mod ops;
pub mod stats;
pub mod table;
pub mod types;

pub use column::{Assign, Column};
pub use error::{FrameError, FrameResult};
pub use index::{Selector, Span};
pub use table::{Selection, Table};
