use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{AidRecord, AidRecordFilter};

pub fn insert_aid_record(conn: &Connection, record: &AidRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO student_reasons (id, student_id, category_id, academic_year_id,
         month, amount, note, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id.to_string(),
            record.student_id.to_string(),
            record.category_id.to_string(),
            record.academic_year_id.to_string(),
            record.month,
            record.amount,
            record.note,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_aid_record(conn: &Connection, id: &Uuid) -> Result<Option<AidRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, category_id, academic_year_id, month, amount, note, created_at
         FROM student_reasons WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| Ok(record_fields(row)));
    match result {
        Ok(fields) => Ok(Some(record_from_fields(fields?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Whether aid already exists for (student, category, year, month).
pub fn aid_record_exists(
    conn: &Connection,
    student_id: &Uuid,
    category_id: &Uuid,
    academic_year_id: &Uuid,
    month: u32,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM student_reasons
         WHERE student_id = ?1 AND category_id = ?2 AND academic_year_id = ?3 AND month = ?4",
        params![
            student_id.to_string(),
            category_id.to_string(),
            academic_year_id.to_string(),
            month,
        ],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn list_aid_records(
    conn: &Connection,
    filter: &AidRecordFilter,
) -> Result<Vec<AidRecord>, DatabaseError> {
    let mut sql = String::from(
        "SELECT id, student_id, category_id, academic_year_id, month, amount, note, created_at
         FROM student_reasons WHERE 1=1",
    );
    let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(yid) = &filter.academic_year_id {
        args.push(Box::new(yid.to_string()));
        sql.push_str(&format!(" AND academic_year_id = ?{}", args.len()));
    }
    if let Some(month) = filter.month {
        args.push(Box::new(month));
        sql.push_str(&format!(" AND month = ?{}", args.len()));
    }
    if let Some(sid) = &filter.student_id {
        args.push(Box::new(sid.to_string()));
        sql.push_str(&format!(" AND student_id = ?{}", args.len()));
    }
    if let Some(cid) = &filter.category_id {
        args.push(Box::new(cid.to_string()));
        sql.push_str(&format!(" AND category_id = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let refs: Vec<&dyn rusqlite::ToSql> = args.iter().map(|b| b.as_ref()).collect();
    let rows = stmt.query_map(refs.as_slice(), |row| Ok(record_fields(row)))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(record_from_fields(row??)?);
    }
    Ok(out)
}

pub fn update_aid_record(conn: &Connection, record: &AidRecord) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE student_reasons SET amount = ?2, note = ?3 WHERE id = ?1",
        params![record.id.to_string(), record.amount, record.note],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "AidRecord".into(),
            id: record.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_aid_record(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM student_reasons WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "AidRecord".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Recipient rows for one (academic year, month), joined with student,
/// organisational context and category, ordered for protocol output.
pub struct RecipientRow {
    pub record_id: Uuid,
    pub student_name: String,
    pub faculty_number: String,
    pub group_name: String,
    pub direction_name: String,
    pub school_name: String,
    pub category_name: String,
    pub amount: i64,
}

pub fn get_monthly_recipients(
    conn: &Connection,
    academic_year_id: &Uuid,
    month: u32,
) -> Result<Vec<RecipientRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT r.id,
                s.first_name || ' ' || COALESCE(s.middle_name || ' ', '') || s.last_name,
                s.faculty_number, g.name, d.name, sc.name, c.name, r.amount
         FROM student_reasons r
         JOIN students s ON r.student_id = s.id
         JOIN student_groups g ON s.group_id = g.id
         JOIN directions d ON g.direction_id = d.id
         JOIN schools sc ON d.school_id = sc.id
         JOIN categories c ON r.category_id = c.id
         WHERE r.academic_year_id = ?1 AND r.month = ?2
         ORDER BY sc.name, d.name, g.name, s.last_name, s.first_name, c.name",
    )?;

    let rows = stmt.query_map(params![academic_year_id.to_string(), month], |row| {
        Ok(RecipientRow {
            record_id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            student_name: row.get(1)?,
            faculty_number: row.get(2)?,
            group_name: row.get(3)?,
            direction_name: row.get(4)?,
            school_name: row.get(5)?,
            category_name: row.get(6)?,
            amount: row.get(7)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Total amount granted to one student across an academic year.
pub fn get_student_year_total(
    conn: &Connection,
    student_id: &Uuid,
    academic_year_id: &Uuid,
) -> Result<i64, DatabaseError> {
    let total: i64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM student_reasons
         WHERE student_id = ?1 AND academic_year_id = ?2",
        params![student_id.to_string(), academic_year_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(total)
}

type RecordFields = (String, String, String, String, u32, i64, Option<String>, String);

fn record_fields(row: &rusqlite::Row<'_>) -> Result<RecordFields, rusqlite::Error> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn record_from_fields(fields: RecordFields) -> Result<AidRecord, DatabaseError> {
    let (id, student_id, category_id, academic_year_id, month, amount, note, created_at) = fields;
    Ok(AidRecord {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        student_id: Uuid::parse_str(&student_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        category_id: Uuid::parse_str(&category_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        academic_year_id: Uuid::parse_str(&academic_year_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        month,
        amount,
        note,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default(),
    })
}
