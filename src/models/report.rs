use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use super::analysis::ReportAnalysis;
use super::enums::{ReportStatus, ReportType};
use super::parameter::TestParameter;

/// Normalized output of the standardization pipeline.
///
/// `results` is the single canonical parameter list. Legacy consumers
/// expect a `parameters` mirror; it is emitted at serialization time
/// from the same list, so the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardizedReport {
    pub report_type: ReportType,
    pub results: Vec<TestParameter>,
    pub raw_text: String,
    pub file_name: String,
    pub extracted_date: DateTime<Utc>,
}

impl StandardizedReport {
    /// Backward-compatible alias for `results`.
    pub fn parameters(&self) -> &[TestParameter] {
        &self.results
    }
}

impl Serialize for StandardizedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("StandardizedReport", 6)?;
        s.serialize_field("report_type", &self.report_type)?;
        s.serialize_field("results", &self.results)?;
        // Derived mirror, same list
        s.serialize_field("parameters", &self.results)?;
        s.serialize_field("raw_text", &self.raw_text)?;
        s.serialize_field("file_name", &self.file_name)?;
        s.serialize_field("extracted_date", &self.extracted_date)?;
        s.end()
    }
}

/// Persisted report row. Created on upload with status `processing`,
/// mutated exactly once when the async analysis step lands, deleted
/// only by explicit user action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalReport {
    pub id: Uuid,
    pub user_id: String,
    pub report_type: ReportType,
    pub title: String,
    pub status: ReportStatus,
    pub file_name: String,
    pub raw_text: String,
    pub results: Vec<TestParameter>,
    pub analysis: Option<ReportAnalysis>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalReport {
    /// New report entering the pipeline, analysis still pending.
    pub fn from_standardized(user_id: &str, title: &str, std_report: &StandardizedReport) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            report_type: std_report.report_type,
            title: title.to_string(),
            status: ReportStatus::Processing,
            file_name: std_report.file_name.clone(),
            raw_text: std_report.raw_text.clone(),
            results: std_report.results.clone(),
            analysis: None,
            created_at: now,
            updated_at: now,
        }
    }
}
