use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Direction;

pub fn insert_direction(conn: &Connection, dir: &Direction) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO directions (id, school_id, name, code) VALUES (?1, ?2, ?3, ?4)",
        params![
            dir.id.to_string(),
            dir.school_id.to_string(),
            dir.name,
            dir.code,
        ],
    )?;
    Ok(())
}

pub fn get_direction(conn: &Connection, id: &Uuid) -> Result<Option<Direction>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, school_id, name, code FROM directions WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], direction_from_row);
    match result {
        Ok(dir) => Ok(Some(dir)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Directions of one school, or all of them, ordered by name.
pub fn get_directions(
    conn: &Connection,
    school_id: Option<&Uuid>,
) -> Result<Vec<Direction>, DatabaseError> {
    match school_id {
        Some(sid) => {
            let mut stmt = conn.prepare(
                "SELECT id, school_id, name, code FROM directions
                 WHERE school_id = ?1 ORDER BY name",
            )?;
            let rows = stmt.query_map(params![sid.to_string()], direction_from_row)?;
            rows.map(|r| r.map_err(DatabaseError::from)).collect()
        }
        None => {
            let mut stmt = conn
                .prepare("SELECT id, school_id, name, code FROM directions ORDER BY name")?;
            let rows = stmt.query_map([], direction_from_row)?;
            rows.map(|r| r.map_err(DatabaseError::from)).collect()
        }
    }
}

pub fn update_direction(conn: &Connection, dir: &Direction) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE directions SET school_id = ?2, name = ?3, code = ?4 WHERE id = ?1",
        params![
            dir.id.to_string(),
            dir.school_id.to_string(),
            dir.name,
            dir.code,
        ],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Direction".into(),
            id: dir.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_direction(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM directions WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Direction".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn direction_from_row(row: &rusqlite::Row<'_>) -> Result<Direction, rusqlite::Error> {
    Ok(Direction {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        school_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        name: row.get(2)?,
        code: row.get(3)?,
    })
}
