use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::{ReportStatus, ReportType};
use crate::models::{MedicalReport, ReportAnalysis, TestParameter};

/// Optional filters for report listing.
#[derive(Debug, Default, Clone)]
pub struct ReportFilter {
    pub user_id: Option<String>,
    pub report_type: Option<ReportType>,
    pub status: Option<ReportStatus>,
}

pub fn insert_report(conn: &Connection, report: &MedicalReport) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO reports (id, user_id, report_type, title, status, file_name,
         raw_text, results_json, analysis_json, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            report.id.to_string(),
            report.user_id,
            report.report_type.as_str(),
            report.title,
            report.status.as_str(),
            report.file_name,
            report.raw_text,
            to_json(&report.results)?,
            report
                .analysis
                .as_ref()
                .map(|a| to_json(a))
                .transpose()?,
            report.created_at.to_rfc3339(),
            report.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<MedicalReport, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_REPORT} WHERE id = ?1"))?;
    let mut rows = stmt.query_map(params![id.to_string()], |row| Ok(report_row(row)))?;

    match rows.next() {
        Some(row) => report_from_row(row??),
        None => Err(DatabaseError::NotFound {
            entity_type: "report".into(),
            id: id.to_string(),
        }),
    }
}

pub fn list_reports(
    conn: &Connection,
    filter: &ReportFilter,
) -> Result<Vec<MedicalReport>, DatabaseError> {
    let mut sql = format!("{SELECT_REPORT} WHERE 1=1");
    let mut args: Vec<String> = Vec::new();

    if let Some(user_id) = &filter.user_id {
        args.push(user_id.clone());
        sql.push_str(&format!(" AND user_id = ?{}", args.len()));
    }
    if let Some(report_type) = &filter.report_type {
        args.push(report_type.as_str().to_string());
        sql.push_str(&format!(" AND report_type = ?{}", args.len()));
    }
    if let Some(status) = &filter.status {
        args.push(status.as_str().to_string());
        sql.push_str(&format!(" AND status = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |row| {
        Ok(report_row(row))
    })?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(row??)?);
    }
    Ok(reports)
}

/// The single post-creation mutation: analysis lands, status resolves.
pub fn attach_analysis(
    conn: &Connection,
    id: &Uuid,
    analysis: &ReportAnalysis,
    status: ReportStatus,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE reports SET analysis_json = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
        params![
            to_json(analysis)?,
            status.as_str(),
            Utc::now().to_rfc3339(),
            id.to_string(),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "report".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_report(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM reports WHERE id = ?1", params![id.to_string()])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "report".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

const SELECT_REPORT: &str = "SELECT id, user_id, report_type, title, status, file_name,
     raw_text, results_json, analysis_json, created_at, updated_at FROM reports";

// Internal row type for MedicalReport mapping
struct ReportRow {
    id: String,
    user_id: String,
    report_type: String,
    title: String,
    status: String,
    file_name: String,
    raw_text: String,
    results_json: String,
    analysis_json: Option<String>,
    created_at: String,
    updated_at: String,
}

fn report_row(row: &rusqlite::Row<'_>) -> Result<ReportRow, rusqlite::Error> {
    Ok(ReportRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        report_type: row.get(2)?,
        title: row.get(3)?,
        status: row.get(4)?,
        file_name: row.get(5)?,
        raw_text: row.get(6)?,
        results_json: row.get(7)?,
        analysis_json: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn report_from_row(row: ReportRow) -> Result<MedicalReport, DatabaseError> {
    let results: Vec<TestParameter> = from_json(&row.results_json)?;
    let analysis: Option<ReportAnalysis> =
        row.analysis_json.as_deref().map(from_json).transpose()?;

    Ok(MedicalReport {
        id: parse_uuid(&row.id)?,
        user_id: row.user_id,
        report_type: ReportType::from_str(&row.report_type)?,
        title: row.title,
        status: ReportStatus::from_str(&row.status)?,
        file_name: row.file_name,
        raw_text: row.raw_text,
        results,
        analysis,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
    })
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::CorruptRow(e.to_string()))
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::CorruptRow(e.to_string()))
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::CorruptRow(e.to_string()))
}

pub(crate) fn from_json<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(s).map_err(|e| DatabaseError::CorruptRow(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::{AnalysisSource, ParameterStatus};
    use crate::models::{ReferenceRange, StandardizedReport};

    fn sample_report(user_id: &str) -> MedicalReport {
        let std_report = StandardizedReport {
            report_type: ReportType::Cbc,
            results: vec![TestParameter {
                name: "WBC".into(),
                value: Some(12.5),
                value_text: None,
                unit: Some("x10^9/L".into()),
                status: ParameterStatus::High,
                reference_range: ReferenceRange::new(4.0, 11.0),
            }],
            raw_text: "WBC: 12.5 x10^9/L (4.0-11.0)".into(),
            file_name: "cbc.txt".into(),
            extracted_date: Utc::now(),
        };
        MedicalReport::from_standardized(user_id, "CBC Report", &std_report)
    }

    fn sample_analysis() -> ReportAnalysis {
        ReportAnalysis {
            summary: "Elevated white cell count.".into(),
            findings: vec!["WBC above reference range".into()],
            recommendations: vec!["Discuss with your physician".into()],
            possible_conditions: vec![],
            follow_up_recommended: true,
            follow_up_timeframe: Some("2 weeks".into()),
            ai_confidence_score: 0.8,
            personalized_recommendations: vec![],
            source: AnalysisSource::Fallback,
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        let report = sample_report("user-1");
        insert_report(&conn, &report).unwrap();

        let loaded = get_report(&conn, &report.id).unwrap();
        assert_eq!(loaded.user_id, "user-1");
        assert_eq!(loaded.report_type, ReportType::Cbc);
        assert_eq!(loaded.status, ReportStatus::Processing);
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].name, "WBC");
        assert!(loaded.analysis.is_none());
    }

    #[test]
    fn get_missing_returns_not_found() {
        let conn = open_memory_database().unwrap();
        let result = get_report(&conn, &Uuid::new_v4());
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn list_filters_by_user_and_status() {
        let conn = open_memory_database().unwrap();
        insert_report(&conn, &sample_report("alice")).unwrap();
        insert_report(&conn, &sample_report("alice")).unwrap();
        insert_report(&conn, &sample_report("bob")).unwrap();

        let alice = list_reports(
            &conn,
            &ReportFilter {
                user_id: Some("alice".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(alice.len(), 2);

        let completed = list_reports(
            &conn,
            &ReportFilter {
                status: Some(ReportStatus::Completed),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(completed.is_empty());
    }

    #[test]
    fn attach_analysis_mutates_once() {
        let conn = open_memory_database().unwrap();
        let report = sample_report("user-1");
        insert_report(&conn, &report).unwrap();

        attach_analysis(&conn, &report.id, &sample_analysis(), ReportStatus::Completed).unwrap();

        let loaded = get_report(&conn, &report.id).unwrap();
        assert_eq!(loaded.status, ReportStatus::Completed);
        let analysis = loaded.analysis.unwrap();
        assert_eq!(analysis.source, AnalysisSource::Fallback);
        assert!(analysis.follow_up_recommended);
        assert!(loaded.updated_at >= loaded.created_at);
    }

    #[test]
    fn attach_analysis_on_missing_report_errors() {
        let conn = open_memory_database().unwrap();
        let result = attach_analysis(
            &conn,
            &Uuid::new_v4(),
            &sample_analysis(),
            ReportStatus::Completed,
        );
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn delete_removes_row() {
        let conn = open_memory_database().unwrap();
        let report = sample_report("user-1");
        insert_report(&conn, &report).unwrap();
        delete_report(&conn, &report.id).unwrap();
        assert!(matches!(
            get_report(&conn, &report.id),
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            delete_report(&conn, &report.id),
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
