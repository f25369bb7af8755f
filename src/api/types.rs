//! Shared API state and the response envelope.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use rusqlite::Connection;
use serde::Serialize;

use crate::analysis::AnalysisOrchestrator;
use crate::api::error::ApiError;
use crate::db;
use crate::pipeline::acquire::OcrEngine;

/// Application state shared across requests. Collaborators are
/// injected at construction; database connections open per request.
#[derive(Clone)]
pub struct AppState {
    db_path: PathBuf,
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub ocr: Arc<dyn OcrEngine>,
}

impl AppState {
    pub fn new(
        db_path: PathBuf,
        orchestrator: Arc<AnalysisOrchestrator>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            db_path,
            orchestrator,
            ocr,
        }
    }

    /// Open a database connection for this request.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        db::open_database(&self.db_path).map_err(ApiError::from)
    }
}

/// Uniform response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        })
    }

    pub fn ok_with_message(data: T, message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_empty_fields() {
        let Json(response) = ApiResponse::ok(42);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("message").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn envelope_carries_message() {
        let Json(response) = ApiResponse::ok_with_message("id", "Report uploaded");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Report uploaded");
    }
}
