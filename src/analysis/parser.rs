//! Model-response parsing: fence-tolerant JSON extraction plus a
//! best-effort repair pass for near-JSON output.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::AnalysisError;
use crate::models::enums::AnalysisSource;
use crate::models::ReportAnalysis;

/// Analysis fields as the model reports them — everything optional,
/// validated after parsing.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    summary: Option<String>,
    findings: Option<Vec<String>>,
    recommendations: Option<Vec<String>>,
    #[serde(alias = "possibleConditions")]
    possible_conditions: Option<Vec<String>>,
    #[serde(alias = "followUpRecommended")]
    follow_up_recommended: Option<bool>,
    #[serde(alias = "followUpTimeframe")]
    follow_up_timeframe: Option<String>,
    #[serde(alias = "aiConfidenceScore", alias = "confidence")]
    ai_confidence_score: Option<f32>,
    #[serde(alias = "personalizedRecommendations")]
    personalized_recommendations: Option<Vec<String>>,
}

/// Parse a model response into a `ReportAnalysis`.
///
/// Tolerates markdown fences and surrounding prose; retries through
/// the repair pass when strict parsing fails. Missing required fields
/// are errors — the orchestrator falls back rather than fabricate.
pub fn parse_analysis_response(response: &str) -> Result<ReportAnalysis, AnalysisError> {
    let json = extract_json_block(response).ok_or(AnalysisError::NoJson)?;

    let raw: RawAnalysis = match serde_json::from_str(&json) {
        Ok(raw) => raw,
        Err(first_err) => {
            let repaired = repair_json(&json);
            serde_json::from_str(&repaired)
                .map_err(|_| AnalysisError::JsonParsing(first_err.to_string()))?
        }
    };

    let summary = raw
        .summary
        .filter(|s| !s.trim().is_empty())
        .ok_or(AnalysisError::MissingField("summary"))?;
    let findings = raw.findings.ok_or(AnalysisError::MissingField("findings"))?;
    let recommendations = raw
        .recommendations
        .ok_or(AnalysisError::MissingField("recommendations"))?;

    Ok(ReportAnalysis {
        summary,
        findings,
        recommendations,
        possible_conditions: raw.possible_conditions.unwrap_or_default(),
        follow_up_recommended: raw.follow_up_recommended.unwrap_or(false),
        follow_up_timeframe: raw.follow_up_timeframe.filter(|s| !s.trim().is_empty()),
        ai_confidence_score: raw.ai_confidence_score.unwrap_or(0.5).clamp(0.0, 1.0),
        personalized_recommendations: raw.personalized_recommendations.unwrap_or_default(),
        source: AnalysisSource::Model,
    })
}

/// Extract the JSON payload: fenced block first, then the outermost
/// brace span.
pub fn extract_json_block(response: &str) -> Option<String> {
    if let Some(fence_start) = response.find("```json") {
        let content_start = fence_start + 7;
        if let Some(fence_len) = response[content_start..].find("```") {
            return Some(response[content_start..content_start + fence_len].trim().to_string());
        }
    }
    // Generic fence without a language tag
    if let Some(fence_start) = response.find("```") {
        let content_start = fence_start + 3;
        if let Some(fence_len) = response[content_start..].find("```") {
            let inner = response[content_start..content_start + fence_len].trim();
            if inner.starts_with('{') {
                return Some(inner.to_string());
            }
        }
    }
    let open = response.find('{')?;
    let close = response.rfind('}')?;
    if close <= open {
        return None;
    }
    Some(response[open..=close].to_string())
}

static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Best-effort repair: straighten smart quotes, drop trailing commas.
pub fn repair_json(json: &str) -> String {
    let straightened = json
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    TRAILING_COMMA_RE.replace_all(&straightened, "$1").into_owned()
}

/// Parse a model response expected to carry a JSON string array.
/// Falls back to non-empty lines when no array parses.
pub fn parse_string_list(response: &str) -> Vec<String> {
    if let Some(json) = extract_json_block(response)
        .or_else(|| extract_array_block(response))
    {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(&json)
            .or_else(|_| serde_json::from_str::<Vec<String>>(&repair_json(&json)))
        {
            return items;
        }
    }
    response
        .lines()
        .map(|line| line.trim_start_matches(['-', '*', ' ']).trim())
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(str::to_string)
        .collect()
}

fn extract_array_block(response: &str) -> Option<String> {
    let open = response.find('[')?;
    let close = response.rfind(']')?;
    if close <= open {
        return None;
    }
    Some(response[open..=close].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_JSON: &str = r#"{
        "summary": "Mild anemia pattern.",
        "findings": ["Hemoglobin below range"],
        "recommendations": ["Discuss iron studies with your physician"],
        "possible_conditions": ["Iron deficiency"],
        "follow_up_recommended": true,
        "follow_up_timeframe": "4 weeks",
        "ai_confidence_score": 0.82,
        "personalized_recommendations": ["Increase dietary iron"]
    }"#;

    #[test]
    fn parses_bare_json() {
        let analysis = parse_analysis_response(VALID_JSON).unwrap();
        assert_eq!(analysis.summary, "Mild anemia pattern.");
        assert_eq!(analysis.findings.len(), 1);
        assert!((analysis.ai_confidence_score - 0.82).abs() < f32::EPSILON);
        assert_eq!(analysis.source, crate::models::enums::AnalysisSource::Model);
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let response = format!("Here is my analysis:\n\n```json\n{VALID_JSON}\n```\n\nLet me know!");
        let analysis = parse_analysis_response(&response).unwrap();
        assert_eq!(analysis.summary, "Mild anemia pattern.");
    }

    #[test]
    fn parses_camel_case_aliases() {
        let response = r#"{
            "summary": "All values within range.",
            "findings": [],
            "recommendations": ["Maintain current habits"],
            "followUpRecommended": false,
            "aiConfidenceScore": 0.9
        }"#;
        let analysis = parse_analysis_response(response).unwrap();
        assert!(!analysis.follow_up_recommended);
        assert!((analysis.ai_confidence_score - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn repairs_trailing_commas_and_smart_quotes() {
        let response = "{
            \u{201C}summary\u{201D}: \u{201C}Values look stable.\u{201D},
            \"findings\": [\"None\",],
            \"recommendations\": [\"Routine follow-up\",],
        }";
        let analysis = parse_analysis_response(response).unwrap();
        assert_eq!(analysis.summary, "Values look stable.");
        assert_eq!(analysis.findings, vec!["None"]);
    }

    #[test]
    fn missing_summary_is_an_error() {
        let response = r#"{"findings": [], "recommendations": []}"#;
        assert!(matches!(
            parse_analysis_response(response),
            Err(AnalysisError::MissingField("summary"))
        ));
    }

    #[test]
    fn no_json_is_an_error() {
        assert!(matches!(
            parse_analysis_response("I cannot analyze this report."),
            Err(AnalysisError::NoJson)
        ));
    }

    #[test]
    fn broken_json_is_an_error() {
        assert!(matches!(
            parse_analysis_response("{summary: totally broken}"),
            Err(AnalysisError::JsonParsing(_))
        ));
    }

    #[test]
    fn confidence_clamped() {
        let response = r#"{"summary": "s", "findings": [], "recommendations": [], "ai_confidence_score": 7.5}"#;
        let analysis = parse_analysis_response(response).unwrap();
        assert_eq!(analysis.ai_confidence_score, 1.0);
    }

    #[test]
    fn string_list_from_json_array() {
        let items = parse_string_list(r#"["Walk daily", "Sleep 8 hours"]"#);
        assert_eq!(items, vec!["Walk daily", "Sleep 8 hours"]);
    }

    #[test]
    fn string_list_from_bullet_lines() {
        let items = parse_string_list("- Walk daily\n- Sleep 8 hours\n");
        assert_eq!(items, vec!["Walk daily", "Sleep 8 hours"]);
    }
}
