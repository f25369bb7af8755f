//! Report standardization: classify, extract, fill.

use chrono::Utc;

use super::classify::classify_with_fallback;
use super::extract::{extract_parameters, fill_missing_parameters};
use crate::models::enums::ReportType;
use crate::models::parameter::TestParameter;
use crate::models::report::StandardizedReport;

/// Caller-supplied inputs that shape standardization.
#[derive(Debug, Default, Clone)]
pub struct StandardizeOptions {
    /// Overrides the classifier verdict when present.
    pub report_type_override: Option<ReportType>,
    /// Pre-extracted parameters. Non-empty short-circuits extraction
    /// entirely — they are trusted as-is, even if stale.
    pub caller_parameters: Vec<TestParameter>,
    /// Parameters synthesized during acquisition (e.g. DICOM file
    /// size), appended after extraction.
    pub extra_parameters: Vec<TestParameter>,
}

/// Turn raw report text into a normalized document.
///
/// Deterministic: identical text and options produce the identical
/// parameter list.
pub fn standardize(text: &str, file_name: &str, options: StandardizeOptions) -> StandardizedReport {
    let _span = tracing::debug_span!("standardize", file_name).entered();

    let report_type = options
        .report_type_override
        .unwrap_or_else(|| classify_with_fallback(text, file_name));

    let results = if !options.caller_parameters.is_empty() {
        options.caller_parameters
    } else {
        let mut extracted = extract_parameters(text, report_type);
        extracted.extend(options.extra_parameters);
        fill_missing_parameters(extracted, report_type)
    };

    StandardizedReport {
        report_type,
        results,
        raw_text: text.to_string(),
        file_name: file_name.to_string(),
        extracted_date: Utc::now(),
    }
}
