use std::str::FromStr;

use rusqlite::{params, Connection};

use super::report::{from_json, parse_timestamp, parse_uuid, to_json};
use crate::db::DatabaseError;
use crate::models::enums::AnalysisSource;
use crate::models::HealthPlan;

pub fn insert_health_plan(conn: &Connection, plan: &HealthPlan) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO health_plans (id, user_id, summary, actions_json, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            plan.id.to_string(),
            plan.user_id,
            plan.summary,
            to_json(&plan.actions)?,
            plan.source.as_str(),
            plan.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn list_health_plans(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<HealthPlan>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, summary, actions_json, source, created_at
         FROM health_plans WHERE user_id = ?1 ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map(params![user_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut plans = Vec::new();
    for row in rows {
        let (id, user_id, summary, actions_json, source, created_at) = row?;
        plans.push(HealthPlan {
            id: parse_uuid(&id)?,
            user_id,
            summary,
            actions: from_json(&actions_json)?,
            source: AnalysisSource::from_str(&source)?,
            created_at: parse_timestamp(&created_at)?,
        });
    }
    Ok(plans)
}
