//! Delivery boundary for rendered artifacts.
//!
//! The engine's output contract is exactly: artifact bytes, a MIME-type
//! hint, and a filename derived from the document title and current date.
//! Persisting or offering the artifact to the end user is the surrounding
//! application's concern, reached through the [`ArtifactSink`] trait.

use chrono::{NaiveDate, Utc};
use granary_shared::AppError;

/// MIME type of the tabular (PDF) artifact.
pub const MIME_PDF: &str = "application/pdf";

/// MIME type of the delimited (CSV) artifact.
pub const MIME_CSV: &str = "text/csv";

/// A rendered, downloadable report artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Artifact content.
    pub bytes: Vec<u8>,
    /// MIME-type hint for the delivery boundary.
    pub mime_type: &'static str,
    /// Download filename.
    pub filename: String,
}

impl RenderedArtifact {
    /// Creates an artifact named after the document title and today's date.
    #[must_use]
    pub fn new(title: &str, bytes: Vec<u8>, mime_type: &'static str, extension: &str) -> Self {
        Self {
            bytes,
            mime_type,
            filename: filename(title, Utc::now().date_naive(), extension),
        }
    }
}

/// Derives a download filename from a document title and date
/// (e.g., "expense-report-2026-08-08.pdf").
#[must_use]
pub fn filename(title: &str, date: NaiveDate, extension: &str) -> String {
    let slug = title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{slug}-{date}.{extension}")
}

/// Destination for rendered artifacts, implemented by the surrounding
/// application (file download, object storage, ...). The engine itself never
/// performs I/O.
pub trait ArtifactSink {
    /// Persists or offers the artifact to the end user.
    fn deliver(&mut self, artifact: RenderedArtifact) -> Result<(), AppError>;
}
