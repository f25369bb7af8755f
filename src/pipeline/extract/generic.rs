//! Last-rung generic patterns for unrecognized report layouts.

use std::sync::LazyLock;

use regex::Regex;

use super::patterns::{NUM, RANGE, UNIT};
use super::{build_parameter, ExtractStrategy};
use crate::models::enums::ReportType;
use crate::models::parameter::TestParameter;
use crate::pipeline::status::parse_numeric;

/// `Name: value unit (ref)` and `Name   value unit min-max` forms with
/// arbitrary parameter names.
pub struct GenericPatterns;

static COLON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?im)^\s*(?P<name>[a-z][a-z ./%\-]{{2,40}}?)\s*[:=]\s*(?P<value>{NUM})(?:\s*(?P<unit>{UNIT}))?(?:\s*{RANGE})?\s*$"
    ))
    .unwrap()
});

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?im)^\s*(?P<name>[a-z][a-z ./%\-]{{2,40}}?)[ \t]{{2,}}(?P<value>{NUM})(?:[ \t]+(?P<unit>{UNIT}))?(?:[ \t]+(?P<min>\d+(?:[.,]\d+)?)\s*(?:-|–|to)\s*(?P<max>\d+(?:[.,]\d+)?))?[ \t]*$"
    ))
    .unwrap()
});

/// Row labels that are document furniture, not measurements.
const NAME_STOPLIST: &[&str] = &[
    "date",
    "name",
    "patient",
    "patient name",
    "dob",
    "age",
    "sex",
    "gender",
    "doctor",
    "physician",
    "provider",
    "page",
    "id",
    "mrn",
    "accession",
    "specimen",
    "collected",
    "received",
    "reported",
    "phone",
    "fax",
];

impl ExtractStrategy for GenericPatterns {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn try_extract(&self, text: &str, _report_type: ReportType) -> Option<Vec<TestParameter>> {
        let mut params: Vec<TestParameter> = Vec::new();

        for re in [&*COLON_RE, &*ROW_RE] {
            for caps in re.captures_iter(text) {
                let name = normalize_name(&caps["name"]);
                if name.is_empty()
                    || NAME_STOPLIST.contains(&name.to_ascii_lowercase().as_str())
                {
                    continue;
                }
                if params.iter().any(|p| p.name.eq_ignore_ascii_case(&name)) {
                    continue;
                }
                params.push(build_parameter(
                    &name,
                    &caps["value"],
                    caps.name("unit").map(|m| m.as_str()),
                    caps.name("min").and_then(|m| parse_numeric(m.as_str())),
                    caps.name("max").and_then(|m| parse_numeric(m.as_str())),
                    false,
                ));
            }
        }

        if params.is_empty() {
            None
        } else {
            Some(params)
        }
    }
}

fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
