//! `GET /api/trends` — numeric parameter series across a user's
//! stored reports.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, AppState};
use crate::db::repository;
use crate::models::enums::ParameterStatus;

#[derive(Deserialize, Default)]
pub struct TrendsQuery {
    pub user_id: Option<String>,
    /// Restrict to one parameter name (case-insensitive).
    pub parameter: Option<String>,
}

#[derive(Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: f64,
    pub status: ParameterStatus,
}

#[derive(Serialize)]
pub struct TrendSeries {
    pub parameter: String,
    pub unit: Option<String>,
    pub points: Vec<TrendPoint>,
}

pub async fn trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<ApiResponse<Vec<TrendSeries>>>, ApiError> {
    let conn = state.open_db()?;
    let mut reports = repository::list_reports(
        &conn,
        &repository::ReportFilter {
            user_id: Some(query.user_id.unwrap_or_else(|| "local".to_string())),
            ..Default::default()
        },
    )?;
    // Listing is newest-first; series read oldest-first.
    reports.reverse();

    let wanted = query.parameter.map(|p| p.to_ascii_lowercase());
    let mut series: BTreeMap<String, TrendSeries> = BTreeMap::new();

    for report in &reports {
        for param in &report.results {
            let Some(value) = param.value else { continue };
            if let Some(wanted) = &wanted {
                if param.name.to_ascii_lowercase() != *wanted {
                    continue;
                }
            }
            let entry = series
                .entry(param.name.clone())
                .or_insert_with(|| TrendSeries {
                    parameter: param.name.clone(),
                    unit: param.unit.clone(),
                    points: Vec::new(),
                });
            if entry.unit.is_none() {
                entry.unit = param.unit.clone();
            }
            entry.points.push(TrendPoint {
                date: report.created_at.to_rfc3339(),
                value,
                status: param.status,
            });
        }
    }

    Ok(ApiResponse::ok(series.into_values().collect()))
}
