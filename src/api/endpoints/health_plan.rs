//! `POST /api/health-plan` — model-backed health plan with canned
//! fallback, persisted per user.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::recommendations::report_digest;
use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, AppState};
use crate::db::repository;
use crate::models::HealthPlan;

#[derive(Deserialize)]
pub struct HealthPlanRequest {
    pub user_id: Option<String>,
    pub context: Option<String>,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<HealthPlanRequest>,
) -> Result<Json<ApiResponse<HealthPlan>>, ApiError> {
    let user_id = request.user_id.unwrap_or_else(|| "local".to_string());
    let conn = state.open_db()?;

    let context = match request.context {
        Some(context) if !context.trim().is_empty() => context,
        _ => report_digest(&conn, &user_id)?,
    };

    let (summary, actions, source) = state.orchestrator.health_plan(&context).await;

    let plan = HealthPlan {
        id: Uuid::new_v4(),
        user_id,
        summary,
        actions,
        source,
        created_at: Utc::now(),
    };
    repository::insert_health_plan(&conn, &plan)?;

    Ok(ApiResponse::ok(plan))
}
