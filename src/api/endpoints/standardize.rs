//! `POST /api/standardize` — raw text (or caller parameters) to a
//! normalized report.

use std::str::FromStr;

use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiResponse;
use crate::models::enums::ReportType;
use crate::models::parameter::TestParameter;
use crate::models::report::StandardizedReport;
use crate::pipeline::standardize::{standardize, StandardizeOptions};

#[derive(Deserialize)]
pub struct StandardizeRequest {
    #[serde(default)]
    pub text: String,
    pub file_name: Option<String>,
    pub report_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<TestParameter>,
}

pub async fn run(
    Json(request): Json<StandardizeRequest>,
) -> Result<Json<ApiResponse<StandardizedReport>>, ApiError> {
    if request.text.trim().is_empty() && request.parameters.is_empty() {
        return Err(ApiError::BadRequest(
            "Provide 'text' or a non-empty 'parameters' list".into(),
        ));
    }

    let report_type_override = request
        .report_type
        .as_deref()
        .map(ReportType::from_str)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let report = standardize(
        &request.text,
        request.file_name.as_deref().unwrap_or("inline"),
        StandardizeOptions {
            report_type_override,
            caller_parameters: request.parameters,
            extra_parameters: Vec::new(),
        },
    );
    Ok(ApiResponse::ok(report))
}
