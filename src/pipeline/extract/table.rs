//! Table-shaped strategies: multi-space rows and structured tables.

use std::sync::LazyLock;

use regex::Regex;

use super::patterns::{compiled_specs, lookup_abbreviation, CATEGORICAL_VALUE, NUM, UNIT};
use super::{build_parameter, ExtractStrategy};
use crate::models::enums::ReportType;
use crate::models::parameter::TestParameter;
use crate::pipeline::status::parse_numeric;

/// Row form: `Name   value   [unit]   [min-max]`, columns separated by
/// two or more spaces or tabs. Names must resolve to a known parameter.
pub struct TableRows;

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?im)^\s*(?P<name>[a-z][a-z ./%()\-]{{0,40}}?)[ \t]{{2,}}(?P<value>(?:{CATEGORICAL_VALUE}|{NUM}))(?:[ \t]+(?P<unit>{UNIT}))?(?:[ \t]+(?P<min>\d+(?:[.,]\d+)?)\s*(?:-|–|to)\s*(?P<max>\d+(?:[.,]\d+)?))?[ \t]*$"
    ))
    .unwrap()
});

impl ExtractStrategy for TableRows {
    fn name(&self) -> &'static str {
        "table_rows"
    }

    fn try_extract(&self, text: &str, report_type: ReportType) -> Option<Vec<TestParameter>> {
        let specs = compiled_specs(report_type);
        if specs.is_empty() {
            return None;
        }

        let mut params: Vec<TestParameter> = Vec::new();
        for caps in ROW_RE.captures_iter(text) {
            let raw_name = caps["name"].trim();
            let resolved = lookup_abbreviation(raw_name).or_else(|| {
                specs
                    .iter()
                    .find(|spec| spec.name_only.is_match(raw_name))
                    .map(|spec| spec.canonical)
            });
            let Some(canonical) = resolved else { continue };
            if params.iter().any(|p| p.name == canonical) {
                continue;
            }

            let categorical = specs
                .iter()
                .find(|s| s.canonical == canonical)
                .map(|s| s.categorical)
                .unwrap_or(false);
            params.push(build_parameter(
                canonical,
                &caps["value"],
                caps.name("unit").map(|m| m.as_str()),
                caps.name("min").and_then(|m| parse_numeric(m.as_str())),
                caps.name("max").and_then(|m| parse_numeric(m.as_str())),
                categorical,
            ));
        }

        if params.is_empty() {
            None
        } else {
            Some(params)
        }
    }
}

/// Transposed structured table: a header line naming at least two known
/// parameters (often as abbreviations), with the value row underneath.
pub struct StructuredTable;

impl ExtractStrategy for StructuredTable {
    fn name(&self) -> &'static str {
        "structured_table"
    }

    fn try_extract(&self, text: &str, report_type: ReportType) -> Option<Vec<TestParameter>> {
        let specs = compiled_specs(report_type);
        if specs.is_empty() {
            return None;
        }

        let lines: Vec<&str> = text.lines().collect();
        for (idx, line) in lines.iter().enumerate() {
            let header = resolve_header(line, report_type);
            if header.len() < 2 {
                continue;
            }

            // First following line with enough numeric tokens is the
            // value row.
            for value_line in lines.iter().skip(idx + 1).take(3) {
                let values: Vec<f64> = value_line
                    .split_whitespace()
                    .filter_map(parse_numeric_token)
                    .collect();
                if values.len() < 2 {
                    continue;
                }
                let params: Vec<TestParameter> = header
                    .iter()
                    .zip(values.iter())
                    .map(|(canonical, value)| {
                        build_parameter(canonical, &value.to_string(), None, None, None, false)
                    })
                    .collect();
                if !params.is_empty() {
                    return Some(params);
                }
            }
        }
        None
    }
}

/// Map header tokens to canonical names via the abbreviation table,
/// then via the category aliases.
fn resolve_header(line: &str, report_type: ReportType) -> Vec<&'static str> {
    let specs = compiled_specs(report_type);
    line.split_whitespace()
        .filter_map(|token| {
            lookup_abbreviation(token).or_else(|| {
                specs
                    .iter()
                    .find(|spec| spec.name_only.is_match(token))
                    .map(|spec| spec.canonical)
            })
        })
        .collect()
}

fn parse_numeric_token(token: &str) -> Option<f64> {
    parse_numeric(token)
}
