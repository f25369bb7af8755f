//! Prompt builders for the analysis collaborator.

use crate::models::parameter::TestParameter;
use crate::models::report::StandardizedReport;

/// Keep prompts bounded even for very long raw reports.
const MAX_RAW_TEXT_CHARS: usize = 4000;

/// Narrative analysis prompt: standardized parameters plus raw text,
/// with an explicit JSON contract.
pub fn build_analysis_prompt(report: &StandardizedReport) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(&format!(
        "You are reviewing a {} for a patient. Analyze the extracted values and reply with \
         ONLY a JSON object with these fields: summary (string), findings (string array), \
         recommendations (string array), possible_conditions (string array), \
         follow_up_recommended (boolean), follow_up_timeframe (string or null), \
         ai_confidence_score (number 0-1), personalized_recommendations (string array).\n\n",
        report.report_type.display_name()
    ));

    prompt.push_str("Extracted parameters:\n");
    for param in &report.results {
        prompt.push_str(&format_parameter(param));
        prompt.push('\n');
    }

    prompt.push_str("\nOriginal report text:\n");
    prompt.push_str(truncate(&report.raw_text, MAX_RAW_TEXT_CHARS));
    prompt
}

fn format_parameter(param: &TestParameter) -> String {
    let value = param.display_value().unwrap_or_else(|| "not available".to_string());
    let unit = param.unit.as_deref().unwrap_or("");
    match param.reference_range.display() {
        Some(range) => format!(
            "- {}: {value} {unit} [reference {range}] status={}",
            param.name,
            param.status.as_str()
        ),
        None => format!("- {}: {value} {unit} status={}", param.name, param.status.as_str()),
    }
}

/// Personalized recommendations prompt; expects a JSON string array.
pub fn build_recommendations_prompt(context: &str) -> String {
    format!(
        "Based on the following patient context, reply with ONLY a JSON array of 4-6 short, \
         actionable lifestyle recommendations.\n\nContext:\n{}",
        truncate(context, MAX_RAW_TEXT_CHARS)
    )
}

/// Health-plan prompt; expects `{{\"summary\": ..., \"actions\": [...]}}`.
pub fn build_health_plan_prompt(context: &str) -> String {
    format!(
        "Create a personal health plan from the following patient context. Reply with ONLY a \
         JSON object: {{\"summary\": string, \"actions\": string array}}.\n\nContext:\n{}",
        truncate(context, MAX_RAW_TEXT_CHARS)
    )
}

/// Free-text Q&A prompt.
pub fn build_qa_prompt(question: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) => format!(
            "Answer the patient's question using the report context below. Be concise, avoid \
             diagnosis, and suggest consulting a clinician for medical decisions.\n\n\
             Context:\n{}\n\nQuestion: {question}",
            truncate(ctx, MAX_RAW_TEXT_CHARS)
        ),
        None => format!(
            "Answer the patient's health question. Be concise, avoid diagnosis, and suggest \
             consulting a clinician for medical decisions.\n\nQuestion: {question}"
        ),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
