use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::AcademicYear;

pub fn insert_academic_year(conn: &Connection, year: &AcademicYear) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO academic_years (id, first_year, is_active) VALUES (?1, ?2, ?3)",
        params![year.id.to_string(), year.first_year, year.is_active as i32],
    )?;
    Ok(())
}

pub fn get_academic_year(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<AcademicYear>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, first_year, is_active FROM academic_years WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], year_from_row);
    match result {
        Ok(year) => Ok(Some(year)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All academic years, newest first.
pub fn get_all_academic_years(conn: &Connection) -> Result<Vec<AcademicYear>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_year, is_active FROM academic_years ORDER BY first_year DESC",
    )?;

    let rows = stmt.query_map([], year_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_active_academic_year(
    conn: &Connection,
) -> Result<Option<AcademicYear>, DatabaseError> {
    let mut stmt = conn
        .prepare("SELECT id, first_year, is_active FROM academic_years WHERE is_active = 1")?;

    let result = stmt.query_row([], year_from_row);
    match result {
        Ok(year) => Ok(Some(year)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_academic_year(conn: &Connection, year: &AcademicYear) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE academic_years SET first_year = ?2, is_active = ?3 WHERE id = ?1",
        params![year.id.to_string(), year.first_year, year.is_active as i32],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "AcademicYear".into(),
            id: year.id.to_string(),
        });
    }
    Ok(())
}

/// Marks one year active and clears the flag on every other, in one
/// transaction so at most one active year is ever observable.
pub fn set_active_academic_year(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let tx_result: Result<usize, rusqlite::Error> = (|| {
        conn.execute_batch("BEGIN")?;
        conn.execute("UPDATE academic_years SET is_active = 0", [])?;
        let affected = conn.execute(
            "UPDATE academic_years SET is_active = 1 WHERE id = ?1",
            params![id.to_string()],
        )?;
        conn.execute_batch("COMMIT")?;
        Ok(affected)
    })();

    match tx_result {
        Ok(0) => Err(DatabaseError::NotFound {
            entity_type: "AcademicYear".into(),
            id: id.to_string(),
        }),
        Ok(_) => Ok(()),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e.into())
        }
    }
}

pub fn delete_academic_year(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM academic_years WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "AcademicYear".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn year_from_row(row: &rusqlite::Row<'_>) -> Result<AcademicYear, rusqlite::Error> {
    Ok(AcademicYear {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        first_year: row.get(1)?,
        is_active: row.get::<_, i32>(2)? != 0,
    })
}
