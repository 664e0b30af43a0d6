//! Export error types.

use thiserror::Error;

use crate::format::FormatError;

/// Errors that can occur while rendering an artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A table section carries rows but declares no columns.
    #[error("Section '{0}' has rows but no column specification")]
    MissingColumns(String),

    /// A cell could not be formatted.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The artifact bytes could not be written.
    #[error("Failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for granary_shared::AppError {
    fn from(err: ExportError) -> Self {
        Self::Export(err.to_string())
    }
}
