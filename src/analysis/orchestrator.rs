//! Analysis orchestration: prompt → bounded model call → parse →
//! validate → fallback. No failure escapes this module.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::fallback;
use super::model::AnalysisModel;
use super::parser::{extract_json_block, parse_analysis_response, parse_string_list, repair_json};
use super::prompt;
use super::AnalysisError;
use crate::config;
use crate::models::enums::AnalysisSource;
use crate::models::report::StandardizedReport;
use crate::models::ReportAnalysis;

/// Drives the analysis collaborator. Constructed once at startup with
/// an injected model; tests substitute a mock.
pub struct AnalysisOrchestrator {
    model: Arc<dyn AnalysisModel>,
    timeout: Duration,
}

impl AnalysisOrchestrator {
    pub fn new(model: Arc<dyn AnalysisModel>) -> Self {
        Self {
            model,
            timeout: Duration::from_secs(config::MODEL_TIMEOUT_SECS),
        }
    }

    /// Test hook: shrink the call timeout.
    pub fn with_timeout(model: Arc<dyn AnalysisModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// One bounded model call.
    async fn call_model(&self, prompt: &str) -> Result<String, AnalysisError> {
        match tokio::time::timeout(self.timeout, self.model.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout),
        }
    }

    /// Produce the narrative analysis for a standardized report.
    ///
    /// Infallible by contract: any model or parse failure yields the
    /// deterministic canned analysis instead.
    pub async fn analyze(&self, report: &StandardizedReport) -> ReportAnalysis {
        let prompt = prompt::build_analysis_prompt(report);

        match self.call_model(&prompt).await {
            Ok(response) => match parse_analysis_response(&response) {
                Ok(analysis) => analysis,
                Err(e) => {
                    tracing::warn!(error = %e, "model response unusable, using fallback analysis");
                    fallback::fallback_analysis(report.report_type, &report.results)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "model call failed, using fallback analysis");
                fallback::fallback_analysis(report.report_type, &report.results)
            }
        }
    }

    /// Personalized recommendations from patient context.
    pub async fn recommendations(&self, context: &str) -> (Vec<String>, AnalysisSource) {
        let prompt = prompt::build_recommendations_prompt(context);
        match self.call_model(&prompt).await {
            Ok(response) => {
                let items = parse_string_list(&response);
                if items.is_empty() {
                    (fallback::fallback_recommendations(), AnalysisSource::Fallback)
                } else {
                    (items, AnalysisSource::Model)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "model call failed, using canned recommendations");
                (fallback::fallback_recommendations(), AnalysisSource::Fallback)
            }
        }
    }

    /// Health plan: summary plus action list.
    pub async fn health_plan(&self, context: &str) -> (String, Vec<String>, AnalysisSource) {
        #[derive(Deserialize)]
        struct RawPlan {
            summary: Option<String>,
            actions: Option<Vec<String>>,
        }

        let prompt = prompt::build_health_plan_prompt(context);
        let parsed = match self.call_model(&prompt).await {
            Ok(response) => extract_json_block(&response).and_then(|json| {
                serde_json::from_str::<RawPlan>(&json)
                    .or_else(|_| serde_json::from_str::<RawPlan>(&repair_json(&json)))
                    .ok()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "model call failed, using canned health plan");
                None
            }
        };

        match parsed {
            Some(RawPlan {
                summary: Some(summary),
                actions: Some(actions),
            }) if !summary.trim().is_empty() && !actions.is_empty() => {
                (summary, actions, AnalysisSource::Model)
            }
            _ => {
                let (summary, actions) = fallback::fallback_health_plan();
                (summary, actions, AnalysisSource::Fallback)
            }
        }
    }

    /// Free-text Q&A over optional report context.
    pub async fn answer(&self, question: &str, context: Option<&str>) -> (String, AnalysisSource) {
        let prompt = prompt::build_qa_prompt(question, context);
        match self.call_model(&prompt).await {
            Ok(response) if !response.trim().is_empty() => {
                (response.trim().to_string(), AnalysisSource::Model)
            }
            Ok(_) => (fallback::fallback_answer(), AnalysisSource::Fallback),
            Err(e) => {
                tracing::warn!(error = %e, "model call failed, using canned answer");
                (fallback::fallback_answer(), AnalysisSource::Fallback)
            }
        }
    }
}
