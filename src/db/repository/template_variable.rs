use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::TemplateVariable;

pub fn get_all_template_variables(
    conn: &Connection,
) -> Result<Vec<TemplateVariable>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, name, value FROM template_variables ORDER BY name")?;

    let rows = stmt.query_map([], variable_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_template_variable(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<TemplateVariable>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, name, value FROM template_variables WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], variable_from_row);
    match result {
        Ok(var) => Ok(Some(var)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_template_variable_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<TemplateVariable>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, name, value FROM template_variables WHERE name = ?1")?;

    let result = stmt.query_row(params![name], variable_from_row);
    match result {
        Ok(var) => Ok(Some(var)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert or overwrite the value under a name.
pub fn upsert_template_variable(
    conn: &Connection,
    name: &str,
    value: &str,
) -> Result<TemplateVariable, DatabaseError> {
    if let Some(mut existing) = get_template_variable_by_name(conn, name)? {
        conn.execute(
            "UPDATE template_variables SET value = ?2 WHERE name = ?1",
            params![name, value],
        )?;
        existing.value = value.to_string();
        return Ok(existing);
    }

    let var = TemplateVariable {
        id: Uuid::new_v4(),
        name: name.to_string(),
        value: value.to_string(),
    };
    conn.execute(
        "INSERT INTO template_variables (id, name, value) VALUES (?1, ?2, ?3)",
        params![var.id.to_string(), var.name, var.value],
    )?;
    Ok(var)
}

pub fn update_template_variable(
    conn: &Connection,
    var: &TemplateVariable,
) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE template_variables SET name = ?2, value = ?3 WHERE id = ?1",
        params![var.id.to_string(), var.name, var.value],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "TemplateVariable".into(),
            id: var.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_template_variable(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM template_variables WHERE id = ?1",
        params![id.to_string()],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "TemplateVariable".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn variable_from_row(row: &rusqlite::Row<'_>) -> Result<TemplateVariable, rusqlite::Error> {
    Ok(TemplateVariable {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        name: row.get(1)?,
        value: row.get(2)?,
    })
}
