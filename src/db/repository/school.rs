use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::School;

pub fn insert_school(conn: &Connection, school: &School) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO schools (id, name, abbreviation) VALUES (?1, ?2, ?3)",
        params![school.id.to_string(), school.name, school.abbreviation],
    )?;
    Ok(())
}

pub fn get_school(conn: &Connection, id: &Uuid) -> Result<Option<School>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, name, abbreviation FROM schools WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], school_from_row);
    match result {
        Ok(school) => Ok(Some(school)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_schools(conn: &Connection) -> Result<Vec<School>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, name, abbreviation FROM schools ORDER BY name")?;

    let rows = stmt.query_map([], school_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_school(conn: &Connection, school: &School) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE schools SET name = ?2, abbreviation = ?3 WHERE id = ?1",
        params![school.id.to_string(), school.name, school.abbreviation],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "School".into(),
            id: school.id.to_string(),
        });
    }
    Ok(())
}

/// Deletes the school; directions, groups and students underneath it
/// go with it via FK cascade.
pub fn delete_school(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM schools WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "School".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn school_from_row(row: &rusqlite::Row<'_>) -> Result<School, rusqlite::Error> {
    Ok(School {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        name: row.get(1)?,
        abbreviation: row.get(2)?,
    })
}
