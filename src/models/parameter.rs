use serde::{Deserialize, Serialize};

use super::enums::ParameterStatus;

/// Clinically normal bounds for a parameter. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ReferenceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Human-readable range: "4 - 11", ">= 4", "<= 11".
    pub fn display(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(low), Some(high)) => Some(format!("{low} - {high}")),
            (Some(low), None) => Some(format!(">= {low}")),
            (None, Some(high)) => Some(format!("<= {high}")),
            (None, None) => None,
        }
    }
}

/// One named lab measurement extracted from a report.
///
/// Numeric readings live in `value`; categorical readings (urinalysis
/// "negative"/"trace", colors) and unparseable numerics live in
/// `value_text`. Placeholders for expected-but-missing parameters carry
/// neither and status `not_available`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestParameter {
    pub name: String,
    pub value: Option<f64>,
    pub value_text: Option<String>,
    pub unit: Option<String>,
    pub status: ParameterStatus,
    pub reference_range: ReferenceRange,
}

impl TestParameter {
    /// Placeholder for an expected parameter the extractor did not find.
    pub fn missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
            value_text: None,
            unit: None,
            status: ParameterStatus::NotAvailable,
            reference_range: ReferenceRange::default(),
        }
    }

    /// Display value for API consumers: numeric first, text otherwise.
    pub fn display_value(&self) -> Option<String> {
        self.value
            .map(|v| v.to_string())
            .or_else(|| self.value_text.clone())
    }

    pub fn is_placeholder(&self) -> bool {
        self.status == ParameterStatus::NotAvailable
            && self.value.is_none()
            && self.value_text.is_none()
    }
}
