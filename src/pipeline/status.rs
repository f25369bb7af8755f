//! Reference-range status resolution.
//!
//! One resolver for the whole crate. The critical band is a percentage
//! beyond the reference bound; callers that only need low/normal/high
//! pass `None` and get the simple three-way split from the same code.

use crate::models::enums::ParameterStatus;
use crate::models::parameter::ReferenceRange;

/// Outcome of resolving a raw value against a reference range.
///
/// Non-numeric input is an explicit outcome, not a silent "normal":
/// NaN comparisons would otherwise downgrade malformed values without
/// a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusResolution {
    Resolved(ParameterStatus),
    Unparseable,
}

impl StatusResolution {
    pub fn status(&self) -> ParameterStatus {
        match self {
            Self::Resolved(status) => *status,
            Self::Unparseable => ParameterStatus::Unparseable,
        }
    }
}

/// Resolve a raw value string against a reference range.
///
/// `critical_threshold_percent` widens the verdict to critical_low /
/// critical_high when the value lies more than that percentage beyond
/// the violated bound.
pub fn resolve_status(
    raw_value: &str,
    range: &ReferenceRange,
    critical_threshold_percent: Option<f64>,
) -> StatusResolution {
    match parse_numeric(raw_value) {
        Some(value) => StatusResolution::Resolved(resolve_numeric(
            value,
            range,
            critical_threshold_percent,
        )),
        None => StatusResolution::Unparseable,
    }
}

/// Resolve an already-numeric value against a reference range.
pub fn resolve_numeric(
    value: f64,
    range: &ReferenceRange,
    critical_threshold_percent: Option<f64>,
) -> ParameterStatus {
    if let Some(min) = range.min {
        if value < min {
            if let Some(pct) = critical_threshold_percent {
                if value < min * (1.0 - pct / 100.0) {
                    return ParameterStatus::CriticalLow;
                }
            }
            return ParameterStatus::Low;
        }
    }
    if let Some(max) = range.max {
        if value > max {
            if let Some(pct) = critical_threshold_percent {
                if value > max * (1.0 + pct / 100.0) {
                    return ParameterStatus::CriticalHigh;
                }
            }
            return ParameterStatus::High;
        }
    }
    ParameterStatus::Normal
}

/// Parse a measurement token: tolerates thousands separators and a
/// leading comparison sign ("<0.01", ">150").
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim()
        .trim_start_matches(['<', '>', '='])
        .replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: ReferenceRange = ReferenceRange {
        min: Some(4.0),
        max: Some(11.0),
    };

    #[test]
    fn value_below_min_is_low() {
        assert_eq!(resolve_numeric(3.5, &RANGE, None), ParameterStatus::Low);
    }

    #[test]
    fn value_above_max_is_high() {
        assert_eq!(resolve_numeric(12.5, &RANGE, None), ParameterStatus::High);
    }

    #[test]
    fn value_inside_range_is_normal() {
        assert_eq!(resolve_numeric(7.0, &RANGE, None), ParameterStatus::Normal);
        assert_eq!(resolve_numeric(4.0, &RANGE, None), ParameterStatus::Normal);
        assert_eq!(resolve_numeric(11.0, &RANGE, None), ParameterStatus::Normal);
    }

    #[test]
    fn critical_band_applies_beyond_threshold() {
        // 20% beyond min 4.0 → below 3.2 is critical
        assert_eq!(
            resolve_numeric(3.5, &RANGE, Some(20.0)),
            ParameterStatus::Low
        );
        assert_eq!(
            resolve_numeric(3.0, &RANGE, Some(20.0)),
            ParameterStatus::CriticalLow
        );
        // 20% beyond max 11.0 → above 13.2 is critical
        assert_eq!(
            resolve_numeric(12.5, &RANGE, Some(20.0)),
            ParameterStatus::High
        );
        assert_eq!(
            resolve_numeric(14.0, &RANGE, Some(20.0)),
            ParameterStatus::CriticalHigh
        );
    }

    #[test]
    fn open_ended_ranges() {
        let min_only = ReferenceRange {
            min: Some(3.5),
            max: None,
        };
        assert_eq!(resolve_numeric(3.0, &min_only, None), ParameterStatus::Low);
        assert_eq!(
            resolve_numeric(100.0, &min_only, None),
            ParameterStatus::Normal
        );

        let empty = ReferenceRange::default();
        assert_eq!(resolve_numeric(42.0, &empty, None), ParameterStatus::Normal);
    }

    #[test]
    fn non_numeric_is_unparseable_not_normal() {
        assert_eq!(
            resolve_status("pending", &RANGE, None),
            StatusResolution::Unparseable
        );
        assert_eq!(
            resolve_status("", &RANGE, None),
            StatusResolution::Unparseable
        );
        assert_eq!(
            resolve_status("12..5", &RANGE, None),
            StatusResolution::Unparseable
        );
    }

    #[test]
    fn tolerant_numeric_parsing() {
        assert_eq!(parse_numeric("1,250"), Some(1250.0));
        assert_eq!(parse_numeric("<0.01"), Some(0.01));
        assert_eq!(parse_numeric(" 12.5 "), Some(12.5));
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn resolved_status_accessor() {
        assert_eq!(
            resolve_status("12.5", &RANGE, None).status(),
            ParameterStatus::High
        );
        assert_eq!(
            resolve_status("n/a", &RANGE, None).status(),
            ParameterStatus::Unparseable
        );
    }
}
