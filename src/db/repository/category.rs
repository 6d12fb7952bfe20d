use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Category;

pub fn insert_category(conn: &Connection, cat: &Category) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO categories (id, name, description, monthly_cap) VALUES (?1, ?2, ?3, ?4)",
        params![cat.id.to_string(), cat.name, cat.description, cat.monthly_cap],
    )?;
    Ok(())
}

pub fn get_category(conn: &Connection, id: &Uuid) -> Result<Option<Category>, DatabaseError> {
    let mut stmt = conn
        .prepare("SELECT id, name, description, monthly_cap FROM categories WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], category_from_row);
    match result {
        Ok(cat) => Ok(Some(cat)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_categories(conn: &Connection) -> Result<Vec<Category>, DatabaseError> {
    let mut stmt = conn
        .prepare("SELECT id, name, description, monthly_cap FROM categories ORDER BY name")?;

    let rows = stmt.query_map([], category_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_category(conn: &Connection, cat: &Category) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE categories SET name = ?2, description = ?3, monthly_cap = ?4 WHERE id = ?1",
        params![cat.id.to_string(), cat.name, cat.description, cat.monthly_cap],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Category".into(),
            id: cat.id.to_string(),
        });
    }
    Ok(())
}

/// Rejected by the FK on student_reasons when aid was recorded under
/// the category; assignments alone cascade away.
pub fn delete_category(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM categories WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Category".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn category_from_row(row: &rusqlite::Row<'_>) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        name: row.get(1)?,
        description: row.get(2)?,
        monthly_cap: row.get(3)?,
    })
}
