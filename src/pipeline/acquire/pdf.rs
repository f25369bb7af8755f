//! PDF text-layer extraction.

use super::AcquireError;

/// Extract the text layer from PDF bytes. Pages arrive concatenated
/// with newline separators. An empty string is a valid result — the
/// caller decides whether to degrade.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AcquireError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| AcquireError::Pdf(e.to_string()))
}
