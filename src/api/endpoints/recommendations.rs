//! `POST /api/recommendations` — personalized recommendations,
//! persisted per user.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, AppState};
use crate::db::repository;
use crate::models::enums::AnalysisSource;
use crate::models::Recommendation;

#[derive(Deserialize)]
pub struct RecommendationsRequest {
    pub user_id: Option<String>,
    /// Free-form context; defaults to a digest of the user's recent
    /// reports.
    pub context: Option<String>,
}

#[derive(Serialize)]
pub struct RecommendationsData {
    pub recommendations: Vec<String>,
    pub source: AnalysisSource,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> Result<Json<ApiResponse<RecommendationsData>>, ApiError> {
    let user_id = request.user_id.unwrap_or_else(|| "local".to_string());
    let conn = state.open_db()?;

    let context = match request.context {
        Some(context) if !context.trim().is_empty() => context,
        _ => report_digest(&conn, &user_id)?,
    };

    let (recommendations, source) = state.orchestrator.recommendations(&context).await;

    let now = Utc::now();
    for body in &recommendations {
        repository::insert_recommendation(
            &conn,
            &Recommendation {
                id: Uuid::new_v4(),
                user_id: user_id.clone(),
                category: "lifestyle".to_string(),
                body: body.clone(),
                source,
                created_at: now,
            },
        )?;
    }

    Ok(ApiResponse::ok(RecommendationsData {
        recommendations,
        source,
    }))
}

/// Digest of the user's recent abnormal values for prompting.
pub(crate) fn report_digest(
    conn: &rusqlite::Connection,
    user_id: &str,
) -> Result<String, ApiError> {
    let reports = repository::list_reports(
        conn,
        &repository::ReportFilter {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        },
    )?;

    if reports.is_empty() {
        return Ok("No recent lab reports on file.".to_string());
    }

    let mut digest = String::new();
    for report in reports.iter().take(5) {
        digest.push_str(&format!(
            "{} ({}):\n",
            report.title,
            report.created_at.format("%Y-%m-%d")
        ));
        for param in report.results.iter().filter(|p| p.status.is_abnormal()) {
            let value = param.display_value().unwrap_or_default();
            digest.push_str(&format!(
                "  {} = {value} [{}]\n",
                param.name,
                param.status.as_str()
            ));
        }
    }
    Ok(digest)
}
