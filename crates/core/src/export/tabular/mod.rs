//! Tabular (PDF) export.
//!
//! Two-pass rendering: a layout pass flows the document into fixed-size
//! pages, a stamping pass adds "Page X of N" footers once the page count is
//! known, and the PDF writer serializes the result.

pub(crate) mod layout;
pub(crate) mod pdf;

use tracing::debug;

use super::delivery::{MIME_PDF, RenderedArtifact};
use super::error::ExportError;
use super::types::ExportOptions;
use crate::reports::ReportDocument;

/// Renders a document into a paginated PDF artifact.
///
/// # Errors
///
/// Returns `ExportError` on a malformed section (rows without columns), a
/// cell that cannot be formatted, or a write failure.
pub fn render(
    document: &ReportDocument,
    options: &ExportOptions,
) -> Result<RenderedArtifact, ExportError> {
    let mut pages = layout::layout(document, options)?;
    layout::stamp_footers(&mut pages, &options.attribution);

    let mut bytes = Vec::new();
    pdf::render(&pages, &mut bytes)?;

    debug!(
        pages = pages.len(),
        bytes = bytes.len(),
        "rendered tabular export"
    );
    Ok(RenderedArtifact::new(&document.title, bytes, MIME_PDF, "pdf"))
}
