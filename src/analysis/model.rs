//! The external language-model collaborator boundary.

use async_trait::async_trait;

use super::AnalysisError;

/// Text-completion collaborator: prompt in, raw response out. The
/// response is expected to embed JSON but may be anything — parsing
/// and repair happen on this side of the seam.
#[async_trait]
pub trait AnalysisModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Collaborator used when no model backend is configured. Every call
/// fails, which the orchestrator turns into deterministic fallback
/// output.
pub struct DisabledModel;

#[async_trait]
impl AnalysisModel for DisabledModel {
    async fn complete(&self, _prompt: &str) -> Result<String, AnalysisError> {
        Err(AnalysisError::ModelFailed(
            "no analysis model configured".into(),
        ))
    }
}

/// Test double returning a fixed response.
pub struct MockModel {
    response: String,
}

impl MockModel {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

#[async_trait]
impl AnalysisModel for MockModel {
    async fn complete(&self, _prompt: &str) -> Result<String, AnalysisError> {
        Ok(self.response.clone())
    }
}

/// Test double that always fails.
pub struct FailingModel;

#[async_trait]
impl AnalysisModel for FailingModel {
    async fn complete(&self, _prompt: &str) -> Result<String, AnalysisError> {
        Err(AnalysisError::ModelFailed("simulated model outage".into()))
    }
}

/// Test double that stalls longer than any reasonable timeout.
pub struct StalledModel {
    pub delay: std::time::Duration,
}

#[async_trait]
impl AnalysisModel for StalledModel {
    async fn complete(&self, _prompt: &str) -> Result<String, AnalysisError> {
        tokio::time::sleep(self.delay).await;
        Ok("too late".to_string())
    }
}
