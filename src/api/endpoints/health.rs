//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

use crate::api::types::ApiResponse;
use crate::config;

#[derive(Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /api/health`
pub async fn check() -> Json<ApiResponse<HealthData>> {
    ApiResponse::ok(HealthData {
        status: "ok",
        version: config::APP_VERSION,
    })
}
