use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Category, CategoryAssignment};

pub fn insert_assignment(
    conn: &Connection,
    assignment: &CategoryAssignment,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO student_categories (id, student_id, category_id) VALUES (?1, ?2, ?3)",
        params![
            assignment.id.to_string(),
            assignment.student_id.to_string(),
            assignment.category_id.to_string(),
        ],
    )?;
    Ok(())
}

/// Whether the student may receive aid under the category.
pub fn assignment_exists(
    conn: &Connection,
    student_id: &Uuid,
    category_id: &Uuid,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM student_categories WHERE student_id = ?1 AND category_id = ?2",
        params![student_id.to_string(), category_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Categories the student is assigned to, ordered by name.
pub fn get_student_categories(
    conn: &Connection,
    student_id: &Uuid,
) -> Result<Vec<Category>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.description, c.monthly_cap
         FROM categories c
         JOIN student_categories sc ON sc.category_id = c.id
         WHERE sc.student_id = ?1
         ORDER BY c.name",
    )?;

    let rows = stmt.query_map(params![student_id.to_string()], |row| {
        Ok(Category {
            id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            name: row.get(1)?,
            description: row.get(2)?,
            monthly_cap: row.get(3)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn delete_assignment(
    conn: &Connection,
    student_id: &Uuid,
    category_id: &Uuid,
) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM student_categories WHERE student_id = ?1 AND category_id = ?2",
        params![student_id.to_string(), category_id.to_string()],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "CategoryAssignment".into(),
            id: format!("{student_id}/{category_id}"),
        });
    }
    Ok(())
}
