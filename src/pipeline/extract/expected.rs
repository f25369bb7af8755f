//! Placeholder fill: downstream consumers rely on a type-complete
//! parameter list with no duplicates.

use super::patterns::expected_names;
use crate::models::enums::ReportType;
use crate::models::parameter::TestParameter;

/// Dedupe extracted parameters by name (first occurrence wins), then
/// append a `not_available` placeholder for every expected parameter
/// the extractor missed. Every expected name appears exactly once in
/// the output.
pub fn fill_missing_parameters(
    extracted: Vec<TestParameter>,
    report_type: ReportType,
) -> Vec<TestParameter> {
    let mut params: Vec<TestParameter> = Vec::with_capacity(extracted.len());
    for param in extracted {
        if !params.iter().any(|p| p.name.eq_ignore_ascii_case(&param.name)) {
            params.push(param);
        }
    }

    for name in expected_names(report_type) {
        if !params.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            params.push(TestParameter::missing(name));
        }
    }
    params
}
