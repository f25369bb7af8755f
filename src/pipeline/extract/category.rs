//! Category-table strategies: the first two rungs of the cascade.

use super::patterns::compiled_specs;
use super::{build_parameter, ExtractStrategy};
use crate::models::enums::ReportType;
use crate::models::parameter::TestParameter;
use crate::pipeline::status::parse_numeric;

/// Full `name: value unit (min-max)` detection per category table.
pub struct CategoryPatterns;

impl ExtractStrategy for CategoryPatterns {
    fn name(&self) -> &'static str {
        "category"
    }

    fn try_extract(&self, text: &str, report_type: ReportType) -> Option<Vec<TestParameter>> {
        let specs = compiled_specs(report_type);
        if specs.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        for spec in specs {
            // First guard-passing occurrence wins; later mentions of the
            // same parameter are ignored.
            for caps in spec.combined.captures_iter(text) {
                let whole = caps.get(0).unwrap();
                if !spec.guard_ok(text, whole.start()) {
                    continue;
                }
                let min = caps.name("min").and_then(|m| parse_numeric(m.as_str()));
                let max = caps.name("max").and_then(|m| parse_numeric(m.as_str()));
                params.push(build_parameter(
                    spec.canonical,
                    &caps["value"],
                    caps.name("unit").map(|m| m.as_str()),
                    min,
                    max,
                    spec.categorical,
                ));
                break;
            }
        }

        if params.is_empty() {
            None
        } else {
            Some(params)
        }
    }
}

/// Looser second rung: the name followed by a value within a short
/// window, no unit or range captured.
pub struct CategoryLoose;

impl ExtractStrategy for CategoryLoose {
    fn name(&self) -> &'static str {
        "category_loose"
    }

    fn try_extract(&self, text: &str, report_type: ReportType) -> Option<Vec<TestParameter>> {
        let specs = compiled_specs(report_type);
        if specs.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        for spec in specs {
            for caps in spec.loose.captures_iter(text) {
                let whole = caps.get(0).unwrap();
                if !spec.guard_ok(text, whole.start()) {
                    continue;
                }
                params.push(build_parameter(
                    spec.canonical,
                    &caps["value"],
                    None,
                    None,
                    None,
                    spec.categorical,
                ));
                break;
            }
        }

        if params.is_empty() {
            None
        } else {
            Some(params)
        }
    }
}
