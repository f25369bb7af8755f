use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AnalysisSource;

/// Narrative analysis attached to a report, produced once by the model
/// collaborator or its deterministic fallback. Immutable once attached;
/// regenerated only by explicit re-request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAnalysis {
    pub summary: String,
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub possible_conditions: Vec<String>,
    pub follow_up_recommended: bool,
    pub follow_up_timeframe: Option<String>,
    pub ai_confidence_score: f32,
    pub personalized_recommendations: Vec<String>,
    pub source: AnalysisSource,
}

/// Persisted personalized recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub user_id: String,
    pub category: String,
    pub body: String,
    pub source: AnalysisSource,
    pub created_at: DateTime<Utc>,
}

/// Persisted health plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPlan {
    pub id: Uuid,
    pub user_id: String,
    pub summary: String,
    pub actions: Vec<String>,
    pub source: AnalysisSource,
    pub created_at: DateTime<Utc>,
}
