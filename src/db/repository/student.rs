use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::StudentStatus;
use crate::models::{Student, StudentFilter, StudentRow};

pub fn insert_student(conn: &Connection, student: &Student) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO students (id, group_id, faculty_number, first_name, middle_name,
         last_name, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            student.id.to_string(),
            student.group_id.to_string(),
            student.faculty_number,
            student.first_name,
            student.middle_name,
            student.last_name,
            student.status.as_str(),
        ],
    )?;
    Ok(())
}

pub fn get_student(conn: &Connection, id: &Uuid) -> Result<Option<Student>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, group_id, faculty_number, first_name, middle_name, last_name, status
         FROM students WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| Ok(student_row_fields(row)));
    match result {
        Ok(fields) => Ok(Some(student_from_fields(fields?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_student_by_faculty_number(
    conn: &Connection,
    faculty_number: &str,
) -> Result<Option<Student>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, group_id, faculty_number, first_name, middle_name, last_name, status
         FROM students WHERE faculty_number = ?1",
    )?;

    let result = stmt.query_row(params![faculty_number], |row| Ok(student_row_fields(row)));
    match result {
        Ok(fields) => Ok(Some(student_from_fields(fields?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Students with group/direction/school context, filtered for list views.
pub fn list_students(
    conn: &Connection,
    filter: &StudentFilter,
) -> Result<Vec<StudentRow>, DatabaseError> {
    let mut sql = String::from(
        "SELECT s.id, s.group_id, s.faculty_number, s.first_name, s.middle_name,
                s.last_name, s.status, g.name, d.name, sc.name, sc.abbreviation
         FROM students s
         JOIN student_groups g ON s.group_id = g.id
         JOIN directions d ON g.direction_id = d.id
         JOIN schools sc ON d.school_id = sc.id
         WHERE 1=1",
    );
    let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(gid) = &filter.group_id {
        args.push(Box::new(gid.to_string()));
        sql.push_str(&format!(" AND s.group_id = ?{}", args.len()));
    }
    if let Some(did) = &filter.direction_id {
        args.push(Box::new(did.to_string()));
        sql.push_str(&format!(" AND g.direction_id = ?{}", args.len()));
    }
    if let Some(sid) = &filter.school_id {
        args.push(Box::new(sid.to_string()));
        sql.push_str(&format!(" AND d.school_id = ?{}", args.len()));
    }
    if let Some(status) = &filter.status {
        args.push(Box::new(status.as_str().to_string()));
        sql.push_str(&format!(" AND s.status = ?{}", args.len()));
    }
    if let Some(search) = &filter.search {
        args.push(Box::new(format!("%{search}%")));
        let n = args.len();
        sql.push_str(&format!(
            " AND (s.faculty_number LIKE ?{n}
              OR LOWER(s.first_name) LIKE LOWER(?{n})
              OR LOWER(s.last_name) LIKE LOWER(?{n}))"
        ));
    }
    sql.push_str(" ORDER BY sc.name, d.name, g.name, s.last_name, s.first_name");

    let mut stmt = conn.prepare(&sql)?;
    let refs: Vec<&dyn rusqlite::ToSql> = args.iter().map(|b| b.as_ref()).collect();
    let rows = stmt.query_map(refs.as_slice(), |row| {
        Ok((
            student_row_fields(row)?,
            row.get::<_, String>(7)?,
            row.get::<_, String>(8)?,
            row.get::<_, String>(9)?,
            row.get::<_, String>(10)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (fields, group_name, direction_name, school_name, school_abbreviation) = row?;
        out.push(StudentRow {
            student: student_from_fields(fields)?,
            group_name,
            direction_name,
            school_name,
            school_abbreviation,
        });
    }
    Ok(out)
}

pub fn update_student(conn: &Connection, student: &Student) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE students SET group_id = ?2, faculty_number = ?3, first_name = ?4,
         middle_name = ?5, last_name = ?6, status = ?7 WHERE id = ?1",
        params![
            student.id.to_string(),
            student.group_id.to_string(),
            student.faculty_number,
            student.first_name,
            student.middle_name,
            student.last_name,
            student.status.as_str(),
        ],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Student".into(),
            id: student.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_student(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM students WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Student".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

type StudentFields = (String, String, String, String, Option<String>, String, String);

fn student_row_fields(row: &rusqlite::Row<'_>) -> Result<StudentFields, rusqlite::Error> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn student_from_fields(fields: StudentFields) -> Result<Student, DatabaseError> {
    let (id, group_id, faculty_number, first_name, middle_name, last_name, status) = fields;
    Ok(Student {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        group_id: Uuid::parse_str(&group_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        faculty_number,
        first_name,
        middle_name,
        last_name,
        status: StudentStatus::from_str(&status)?,
    })
}
