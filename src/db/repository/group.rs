use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::StudentGroup;

pub fn insert_group(conn: &Connection, group: &StudentGroup) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO student_groups (id, direction_id, name) VALUES (?1, ?2, ?3)",
        params![group.id.to_string(), group.direction_id.to_string(), group.name],
    )?;
    Ok(())
}

pub fn get_group(conn: &Connection, id: &Uuid) -> Result<Option<StudentGroup>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, direction_id, name FROM student_groups WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], group_from_row);
    match result {
        Ok(group) => Ok(Some(group)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Groups of one direction, or all of them, ordered by name.
pub fn get_groups(
    conn: &Connection,
    direction_id: Option<&Uuid>,
) -> Result<Vec<StudentGroup>, DatabaseError> {
    match direction_id {
        Some(did) => {
            let mut stmt = conn.prepare(
                "SELECT id, direction_id, name FROM student_groups
                 WHERE direction_id = ?1 ORDER BY name",
            )?;
            let rows = stmt.query_map(params![did.to_string()], group_from_row)?;
            rows.map(|r| r.map_err(DatabaseError::from)).collect()
        }
        None => {
            let mut stmt =
                conn.prepare("SELECT id, direction_id, name FROM student_groups ORDER BY name")?;
            let rows = stmt.query_map([], group_from_row)?;
            rows.map(|r| r.map_err(DatabaseError::from)).collect()
        }
    }
}

pub fn update_group(conn: &Connection, group: &StudentGroup) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE student_groups SET direction_id = ?2, name = ?3 WHERE id = ?1",
        params![group.id.to_string(), group.direction_id.to_string(), group.name],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "StudentGroup".into(),
            id: group.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_group(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM student_groups WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "StudentGroup".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn group_from_row(row: &rusqlite::Row<'_>) -> Result<StudentGroup, rusqlite::Error> {
    Ok(StudentGroup {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        direction_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        name: row.get(2)?,
    })
}
