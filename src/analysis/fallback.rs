//! Deterministic canned analysis used whenever the model collaborator
//! fails. Output is a function of report type and extracted results
//! only — same inputs, same text.

use crate::models::enums::{AnalysisSource, ReportType};
use crate::models::parameter::TestParameter;
use crate::models::ReportAnalysis;

/// Confidence reported by canned output: honest about being a stand-in.
const FALLBACK_CONFIDENCE: f32 = 0.3;

/// Build the canned analysis for a report.
pub fn fallback_analysis(report_type: ReportType, results: &[TestParameter]) -> ReportAnalysis {
    let abnormal: Vec<&TestParameter> =
        results.iter().filter(|p| p.status.is_abnormal()).collect();

    let findings: Vec<String> = abnormal
        .iter()
        .map(|p| {
            let value = p.display_value().unwrap_or_else(|| "?".to_string());
            match p.reference_range.display() {
                Some(range) => format!(
                    "{} is {} at {} (reference {range})",
                    p.name,
                    p.status.as_str().replace('_', " "),
                    value
                ),
                None => format!("{} is {} at {}", p.name, p.status.as_str().replace('_', " "), value),
            }
        })
        .collect();

    let summary = if abnormal.is_empty() {
        format!(
            "Automated review of this {} found no values outside their reference ranges. \
             A clinician should confirm these results.",
            report_type.display_name().to_lowercase()
        )
    } else {
        format!(
            "Automated review of this {} flagged {} value(s) outside the reference range. \
             This is a rule-based summary produced without AI assistance; a clinician should \
             review the results.",
            report_type.display_name().to_lowercase(),
            abnormal.len()
        )
    };

    let mut recommendations = vec![
        "Share this report with your healthcare provider.".to_string(),
    ];
    recommendations.extend(type_recommendations(report_type));

    ReportAnalysis {
        summary,
        findings,
        recommendations,
        possible_conditions: Vec::new(),
        follow_up_recommended: !abnormal.is_empty(),
        follow_up_timeframe: if abnormal.is_empty() {
            None
        } else {
            Some("2-4 weeks".to_string())
        },
        ai_confidence_score: FALLBACK_CONFIDENCE,
        personalized_recommendations: Vec::new(),
        source: AnalysisSource::Fallback,
    }
}

fn type_recommendations(report_type: ReportType) -> Vec<String> {
    match report_type {
        ReportType::Cbc => vec![
            "Stay hydrated and maintain a balanced diet rich in iron and B vitamins.".to_string(),
        ],
        ReportType::LipidPanel => vec![
            "Limit saturated fats and maintain regular aerobic exercise.".to_string(),
        ],
        ReportType::MetabolicPanel => vec![
            "Maintain steady hydration and discuss kidney and liver values with your provider."
                .to_string(),
        ],
        ReportType::Urinalysis => vec![
            "Increase water intake; repeat testing if symptoms persist.".to_string(),
        ],
        ReportType::ThyroidPanel => vec![
            "Thyroid values vary through the day; confirm abnormal results with a repeat draw."
                .to_string(),
        ],
        ReportType::Imaging | ReportType::Pathology => vec![
            "Imaging and pathology findings require specialist interpretation.".to_string(),
        ],
        ReportType::Other => Vec::new(),
    }
}

/// Canned personalized recommendations.
pub fn fallback_recommendations() -> Vec<String> {
    vec![
        "Aim for at least 150 minutes of moderate activity per week.".to_string(),
        "Keep a consistent sleep schedule of 7-9 hours.".to_string(),
        "Favor whole foods and limit added sugar.".to_string(),
        "Schedule routine checkups and bring your recent lab reports.".to_string(),
    ]
}

/// Canned health plan.
pub fn fallback_health_plan() -> (String, Vec<String>) {
    (
        "A general wellness plan. Personalized planning is unavailable right now; \
         these baseline habits apply broadly."
            .to_string(),
        vec![
            "Walk 30 minutes daily.".to_string(),
            "Drink 6-8 glasses of water per day.".to_string(),
            "Eat five servings of fruit and vegetables daily.".to_string(),
            "Review medications and supplements with your pharmacist.".to_string(),
        ],
    )
}

/// Canned answer for Q&A when the model is unavailable.
pub fn fallback_answer() -> String {
    "The assistant is temporarily unavailable. Your report has been saved; please retry \
     shortly, and contact your healthcare provider for urgent questions."
        .to_string()
}
