//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

impl From<ReportError> for granary_shared::AppError {
    fn from(err: ReportError) -> Self {
        Self::Validation(err.to_string())
    }
}
