//! Report CRUD: multipart upload through the full pipeline, listing,
//! retrieval, deletion, and explicit re-analysis.

use std::str::FromStr;

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, AppState};
use crate::config;
use crate::db::repository;
use crate::models::enums::{ReportStatus, ReportType};
use crate::models::report::{MedicalReport, StandardizedReport};
use crate::models::AnalysisSource;
use crate::pipeline;

/// Fallback owner when the caller names no user.
const DEFAULT_USER: &str = "local";

/// `POST /api/reports` — multipart upload.
///
/// The report row is inserted with status `processing` and the
/// analysis step runs as a background task; its completion is the
/// row's single mutation.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<MedicalReport>>, ApiError> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut user_id = DEFAULT_USER.to_string();
    let mut title: Option<String> = None;
    let mut type_override: Option<ReportType> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::BadRequest("File part needs a filename".into()))?;
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?;
                if bytes.len() > config::MAX_UPLOAD_BYTES {
                    return Err(ApiError::BadRequest("File exceeds the upload limit".into()));
                }
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            "user_id" => {
                user_id = text_field(field).await?;
            }
            "title" => {
                title = Some(text_field(field).await?);
            }
            "report_type" => {
                let raw = text_field(field).await?;
                type_override = Some(
                    ReportType::from_str(&raw).map_err(|e| ApiError::BadRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("Field 'file' is required".into()))?;

    let processed = pipeline::process_upload(
        &file_name,
        content_type.as_deref(),
        &bytes,
        state.ocr.as_ref(),
        type_override,
    )?;

    let title = title.unwrap_or_else(|| {
        format!(
            "{} — {}",
            processed.standardized.report_type.display_name(),
            file_name
        )
    });
    let report = MedicalReport::from_standardized(&user_id, &title, &processed.standardized);

    let conn = state.open_db()?;
    repository::insert_report(&conn, &report)?;

    spawn_analysis(state, report.id, processed.standardized);

    Ok(ApiResponse::ok_with_message(
        report,
        "Report uploaded; analysis in progress",
    ))
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed field: {e}")))
}

/// Run the analysis step in the background and attach the result.
fn spawn_analysis(state: AppState, report_id: Uuid, standardized: StandardizedReport) {
    tokio::spawn(async move {
        let analysis = state.orchestrator.analyze(&standardized).await;
        let status = match analysis.source {
            AnalysisSource::Model => ReportStatus::Completed,
            AnalysisSource::Fallback => ReportStatus::CompletedWithErrors,
        };

        let result = state
            .open_db()
            .and_then(|conn| {
                repository::attach_analysis(&conn, &report_id, &analysis, status)
                    .map_err(ApiError::from)
            });
        if let Err(e) = result {
            tracing::error!(report_id = %report_id, error = %e, "failed to attach analysis");
        } else {
            tracing::info!(report_id = %report_id, status = status.as_str(), "analysis attached");
        }
    });
}

#[derive(Deserialize, Default)]
pub struct ReportsQuery {
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub status: Option<String>,
}

/// `GET /api/reports`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<ApiResponse<Vec<MedicalReport>>>, ApiError> {
    let filter = repository::ReportFilter {
        user_id: query.user_id,
        report_type: query
            .report_type
            .as_deref()
            .map(ReportType::from_str)
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        status: query
            .status
            .as_deref()
            .map(ReportStatus::from_str)
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };

    let conn = state.open_db()?;
    let reports = repository::list_reports(&conn, &filter)?;
    Ok(ApiResponse::ok(reports))
}

/// `GET /api/reports/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MedicalReport>>, ApiError> {
    let id = parse_id(&id)?;
    let conn = state.open_db()?;
    let report = repository::get_report(&conn, &id)?;
    Ok(ApiResponse::ok(report))
}

/// `DELETE /api/reports/:id` — the only deletion path; always explicit.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let id = parse_id(&id)?;
    let conn = state.open_db()?;
    repository::delete_report(&conn, &id)?;
    Ok(ApiResponse::ok_with_message(id.to_string(), "Report deleted"))
}

/// `POST /api/reports/:id/reanalyze` — explicit regeneration of the
/// attached analysis.
pub async fn reanalyze(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MedicalReport>>, ApiError> {
    let id = parse_id(&id)?;
    let conn = state.open_db()?;
    let report = repository::get_report(&conn, &id)?;

    let standardized = StandardizedReport {
        report_type: report.report_type,
        results: report.results.clone(),
        raw_text: report.raw_text.clone(),
        file_name: report.file_name.clone(),
        extracted_date: report.created_at,
    };

    let analysis = state.orchestrator.analyze(&standardized).await;
    let status = match analysis.source {
        AnalysisSource::Model => ReportStatus::Completed,
        AnalysisSource::Fallback => ReportStatus::CompletedWithErrors,
    };
    repository::attach_analysis(&conn, &id, &analysis, status)?;

    let updated = repository::get_report(&conn, &id)?;
    Ok(ApiResponse::ok_with_message(updated, "Analysis regenerated"))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid report id: {raw}")))
}
