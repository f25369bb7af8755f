use std::str::FromStr;

use rusqlite::{params, Connection};

use super::report::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::AnalysisSource;
use crate::models::Recommendation;

pub fn insert_recommendation(
    conn: &Connection,
    rec: &Recommendation,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO recommendations (id, user_id, category, body, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            rec.id.to_string(),
            rec.user_id,
            rec.category,
            rec.body,
            rec.source.as_str(),
            rec.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn list_recommendations(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<Recommendation>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, category, body, source, created_at
         FROM recommendations WHERE user_id = ?1 ORDER BY created_at DESC",
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

    let mut recs = Vec::new();
    for row in rows {
        let (id, user_id, category, body, source, created_at) = row?;
        recs.push(Recommendation {
            id: parse_uuid(&id)?,
            user_id,
            category,
            body,
            source: AnalysisSource::from_str(&source)?,
            created_at: parse_timestamp(&created_at)?,
        });
    }
    Ok(recs)
}
