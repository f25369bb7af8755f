//! Parameter extraction from report text.
//!
//! Extraction is an escalating cascade of strategies, tried in order
//! until one yields results:
//!
//! 1. category table, full `name: value unit (min-max)` form
//! 2. category table, loose name-near-value form
//! 3. multi-space table rows
//! 4. structured table (header of known names, value row below)
//! 5. generic `name: value` patterns for unrecognized report types
//!
//! Each strategy is independently testable; the cascade stops at the
//! first non-empty result.

pub mod category;
pub mod expected;
pub mod generic;
pub mod patterns;
pub mod table;

pub use expected::fill_missing_parameters;

use crate::config;
use crate::models::enums::{ParameterStatus, ReportType};
use crate::models::parameter::{ReferenceRange, TestParameter};
use crate::pipeline::status::{parse_numeric, resolve_numeric};

/// One extraction approach. Returns `None` when it found nothing; a
/// returned list is never empty.
pub trait ExtractStrategy {
    fn name(&self) -> &'static str;
    fn try_extract(&self, text: &str, report_type: ReportType) -> Option<Vec<TestParameter>>;
}

/// Run the cascade. An empty result means no strategy matched.
pub fn extract_parameters(text: &str, report_type: ReportType) -> Vec<TestParameter> {
    let strategies: [&dyn ExtractStrategy; 5] = [
        &category::CategoryPatterns,
        &category::CategoryLoose,
        &table::TableRows,
        &table::StructuredTable,
        &generic::GenericPatterns,
    ];

    for strategy in strategies {
        if let Some(params) = strategy.try_extract(text, report_type) {
            tracing::debug!(
                strategy = strategy.name(),
                count = params.len(),
                report_type = report_type.as_str(),
                "extraction strategy matched"
            );
            return params;
        }
    }
    Vec::new()
}

/// Build a parameter from raw captured tokens, resolving status.
pub(crate) fn build_parameter(
    canonical: &str,
    raw_value: &str,
    unit: Option<&str>,
    min: Option<f64>,
    max: Option<f64>,
    categorical: bool,
) -> TestParameter {
    let reference_range = ReferenceRange { min, max };
    let raw = raw_value.trim();

    if let Some(value) = parse_numeric(raw) {
        let status = resolve_numeric(
            value,
            &reference_range,
            Some(config::CRITICAL_THRESHOLD_PERCENT),
        );
        return TestParameter {
            name: canonical.to_string(),
            value: Some(value),
            value_text: None,
            unit: unit.map(str::to_string),
            status,
            reference_range,
        };
    }

    let status = if categorical {
        categorical_status(raw)
    } else {
        ParameterStatus::Unparseable
    };
    TestParameter {
        name: canonical.to_string(),
        value: None,
        value_text: Some(raw.to_ascii_lowercase()),
        unit: unit.map(str::to_string),
        status,
        reference_range,
    }
}

/// Status for categorical (strip/appearance) readings.
fn categorical_status(raw: &str) -> ParameterStatus {
    let v = raw.trim().to_ascii_lowercase();
    match v.as_str() {
        "negative" | "absent" | "none" | "clear" | "normal" | "straw" | "amber" | "yellow"
        | "pale yellow" | "dark yellow" => ParameterStatus::Normal,
        "trace" => ParameterStatus::Borderline,
        "cloudy" | "turbid" | "hazy" | "red" | "brown" => ParameterStatus::Borderline,
        "positive" | "present" => ParameterStatus::High,
        _ if v.ends_with('+') => ParameterStatus::High,
        _ => ParameterStatus::Normal,
    }
}
