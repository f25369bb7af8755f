//! `POST /api/classify` — report-type classification over raw text.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiResponse;
use crate::models::enums::ReportType;
use crate::pipeline::classify::classify_with_fallback;

#[derive(Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
    pub file_name: Option<String>,
}

#[derive(Serialize)]
pub struct ClassifyData {
    pub report_type: ReportType,
    pub display_name: &'static str,
}

pub async fn classify(
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ApiResponse<ClassifyData>>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Field 'text' is required".into()));
    }

    let report_type = classify_with_fallback(
        &request.text,
        request.file_name.as_deref().unwrap_or_default(),
    );
    Ok(ApiResponse::ok(ClassifyData {
        report_type,
        display_name: report_type.display_name(),
    }))
}
