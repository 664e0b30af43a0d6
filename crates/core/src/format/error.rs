//! Formatting error types.

use thiserror::Error;

/// Errors that can occur while formatting a cell.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// A date column received text that is not an ISO calendar date.
    #[error("Unparseable date: {0}")]
    UnparseableDate(String),

    /// A column format was applied to a value it cannot render.
    #[error("Cannot format {value} value as {format}")]
    Incompatible {
        /// Kind of the offending value.
        value: &'static str,
        /// Requested format.
        format: &'static str,
    },
}
