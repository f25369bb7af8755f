//! Analysis-backed endpoints: image analysis, Q&A, and voice
//! transcripts. All of them inherit the orchestrator's guarantee that
//! collaborator failures degrade instead of erroring.

use axum::extract::State;
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, AppState};
use crate::db::repository;
use crate::models::enums::{AnalysisSource, FileType};
use crate::models::report::StandardizedReport;
use crate::models::ReportAnalysis;
use crate::pipeline::acquire::{acquire_text, AcquiredText};
use crate::pipeline::standardize::{standardize, StandardizeOptions};

#[derive(Deserialize)]
pub struct ImageAnalysisRequest {
    /// Base64 image payload; a data-URL prefix is tolerated.
    pub image: String,
    pub file_name: Option<String>,
}

#[derive(Serialize)]
pub struct ImageAnalysisData {
    pub standardized: StandardizedReport,
    pub analysis: ReportAnalysis,
    pub degraded: bool,
}

/// `POST /api/image-analysis`
pub async fn image_analysis(
    State(state): State<AppState>,
    Json(request): Json<ImageAnalysisRequest>,
) -> Result<Json<ApiResponse<ImageAnalysisData>>, ApiError> {
    let encoded = request
        .image
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .unwrap_or(&request.image);
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| ApiError::BadRequest("Field 'image' is not valid base64".into()))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Field 'image' is empty".into()));
    }

    let file_name = request.file_name.unwrap_or_else(|| "upload.jpg".to_string());

    let AcquiredText {
        text,
        degraded,
        extra_parameters,
        ..
    } = acquire_text(FileType::Image, &file_name, &bytes, state.ocr.as_ref());

    let standardized = standardize(
        &text,
        &file_name,
        StandardizeOptions {
            report_type_override: None,
            caller_parameters: Vec::new(),
            extra_parameters,
        },
    );
    let analysis = state.orchestrator.analyze(&standardized).await;

    Ok(ApiResponse::ok(ImageAnalysisData {
        standardized,
        analysis,
        degraded,
    }))
}

#[derive(Deserialize)]
pub struct QaRequest {
    pub question: String,
    /// Optional report to use as answering context.
    pub report_id: Option<String>,
}

#[derive(Serialize)]
pub struct AnswerData {
    pub answer: String,
    pub source: AnalysisSource,
}

/// `POST /api/ai` — free-text Q&A.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<QaRequest>,
) -> Result<Json<ApiResponse<AnswerData>>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Field 'question' is required".into()));
    }

    let context = match &request.report_id {
        Some(raw) => {
            let id = Uuid::parse_str(raw)
                .map_err(|_| ApiError::BadRequest(format!("Invalid report id: {raw}")))?;
            let conn = state.open_db()?;
            Some(repository::get_report(&conn, &id)?.raw_text)
        }
        None => None,
    };

    let (answer, source) = state
        .orchestrator
        .answer(&request.question, context.as_deref())
        .await;
    Ok(ApiResponse::ok(AnswerData { answer, source }))
}

#[derive(Deserialize)]
pub struct VoiceRequest {
    /// Transcribed speech; transcription itself happens client-side.
    pub transcript: String,
}

/// `POST /api/voice` — Q&A over a voice transcript.
pub async fn voice(
    State(state): State<AppState>,
    Json(request): Json<VoiceRequest>,
) -> Result<Json<ApiResponse<AnswerData>>, ApiError> {
    if request.transcript.trim().is_empty() {
        return Err(ApiError::BadRequest("Field 'transcript' is required".into()));
    }
    let (answer, source) = state.orchestrator.answer(&request.transcript, None).await;
    Ok(ApiResponse::ok(AnswerData { answer, source }))
}
