use thiserror::Error;

use crate::types::DataType;

/// Convenience result type for engine operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// Error type returned across the crate.
///
/// This is a single error enum shared by column construction/indexing,
/// table operations, CSV ingestion, and descriptive statistics.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Incompatible column names or dtypes (on append or construction).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// Length mismatch between operands, or between an assigned value and
    /// its target positions.
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Unsupported or out-of-domain selector, or boolean-mask length mismatch.
    #[error("index error: {message}")]
    Index { message: String },

    /// A value could not be coerced to the target dtype and no default-value
    /// fallback applies.
    #[error("cannot convert '{value}' to {target}")]
    Conversion { value: String, target: DataType },

    /// Statistical operation on empty input, percentile rank outside (0, 1),
    /// or an arithmetic domain violation (e.g. integer division by zero).
    #[error("domain error: {message}")]
    Domain { message: String },

    /// CSV row with a field count different from the first data row.
    #[error("invalid number of columns at row {row}")]
    Structure { row: usize },

    /// Operator applied to a dtype pairing with no defined kernel.
    #[error("unsupported operation: {message}")]
    Unsupported { message: String },
}

impl FrameError {
    pub(crate) fn index(message: impl Into<String>) -> Self {
        Self::Index {
            message: message.into(),
        }
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }
}
