//! Aid recording — validation and summary queries on top of the
//! repository layer.
//!
//! Every grant is one `AidRecord` per (student, category, academic year,
//! month); re-granting in the same month under the same category is an
//! amount update, never a second row.

use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::{validate_month, AidRecord};

/// Request to record one monthly aid grant. Amount in minor units.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAidRecord {
    pub student_id: Uuid,
    pub category_id: Uuid,
    pub academic_year_id: Uuid,
    pub month: u32,
    pub amount: i64,
    pub note: Option<String>,
}

/// One recipient line of a monthly summary.
#[derive(Debug, Clone, Serialize)]
pub struct RecipientLine {
    pub record_id: Uuid,
    pub student_name: String,
    pub faculty_number: String,
    pub group_name: String,
    pub direction_name: String,
    pub school_name: String,
    pub category_name: String,
    pub amount: i64,
}

/// Recipients of one (academic year, month) with totals.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub academic_year_label: String,
    pub month: u32,
    pub calendar_year: i32,
    pub recipients: Vec<RecipientLine>,
    pub total_amount: i64,
    pub recipient_count: usize,
}

/// Validates and stores a new aid grant.
///
/// Checks, in order: month range, amount positivity, referenced entities,
/// category eligibility, category cap, one-grant-per-month uniqueness.
pub fn record_aid(conn: &Connection, new: &NewAidRecord) -> Result<AidRecord, DatabaseError> {
    validate_month(new.month)?;
    if new.amount <= 0 {
        return Err(DatabaseError::Validation(format!(
            "amount must be positive, got {}",
            new.amount
        )));
    }

    let student =
        db::get_student(conn, &new.student_id)?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "Student".into(),
            id: new.student_id.to_string(),
        })?;
    let category =
        db::get_category(conn, &new.category_id)?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "Category".into(),
            id: new.category_id.to_string(),
        })?;
    let year = db::get_academic_year(conn, &new.academic_year_id)?.ok_or_else(|| {
        DatabaseError::NotFound {
            entity_type: "AcademicYear".into(),
            id: new.academic_year_id.to_string(),
        }
    })?;

    if !db::assignment_exists(conn, &student.id, &category.id)? {
        return Err(DatabaseError::Validation(format!(
            "student {} is not assigned to category '{}'",
            student.faculty_number, category.name
        )));
    }
    check_cap(&category.name, category.monthly_cap, new.amount)?;
    if db::aid_record_exists(conn, &student.id, &category.id, &year.id, new.month)? {
        return Err(DatabaseError::ConstraintViolation(format!(
            "aid already recorded for {} under '{}' in month {} of {}",
            student.faculty_number,
            category.name,
            new.month,
            year.label()
        )));
    }

    let record = AidRecord {
        id: Uuid::new_v4(),
        student_id: student.id,
        category_id: category.id,
        academic_year_id: year.id,
        month: new.month,
        amount: new.amount,
        note: new.note.clone(),
        created_at: Utc::now(),
    };
    db::insert_aid_record(conn, &record)?;

    tracing::debug!(
        faculty_number = %student.faculty_number,
        category = %category.name,
        month = new.month,
        amount = new.amount,
        "aid recorded"
    );
    Ok(record)
}

/// Changes the amount (and note) of an existing grant, re-running the
/// positivity and cap checks.
pub fn update_aid_amount(
    conn: &Connection,
    record_id: &Uuid,
    amount: i64,
    note: Option<String>,
) -> Result<AidRecord, DatabaseError> {
    if amount <= 0 {
        return Err(DatabaseError::Validation(format!(
            "amount must be positive, got {amount}"
        )));
    }

    let mut record =
        db::get_aid_record(conn, record_id)?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "AidRecord".into(),
            id: record_id.to_string(),
        })?;
    let category =
        db::get_category(conn, &record.category_id)?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "Category".into(),
            id: record.category_id.to_string(),
        })?;

    check_cap(&category.name, category.monthly_cap, amount)?;

    record.amount = amount;
    record.note = note;
    db::update_aid_record(conn, &record)?;
    Ok(record)
}

/// Recipients and totals for one (academic year, month).
pub fn monthly_summary(
    conn: &Connection,
    academic_year_id: &Uuid,
    month: u32,
) -> Result<MonthlySummary, DatabaseError> {
    validate_month(month)?;
    let year = db::get_academic_year(conn, academic_year_id)?.ok_or_else(|| {
        DatabaseError::NotFound {
            entity_type: "AcademicYear".into(),
            id: academic_year_id.to_string(),
        }
    })?;

    let recipients: Vec<RecipientLine> = db::get_monthly_recipients(conn, &year.id, month)?
        .into_iter()
        .map(|r| RecipientLine {
            record_id: r.record_id,
            student_name: r.student_name,
            faculty_number: r.faculty_number,
            group_name: r.group_name,
            direction_name: r.direction_name,
            school_name: r.school_name,
            category_name: r.category_name,
            amount: r.amount,
        })
        .collect();

    let total_amount = recipients.iter().map(|r| r.amount).sum();
    Ok(MonthlySummary {
        academic_year_label: year.label(),
        month,
        calendar_year: year.calendar_year_of(month)?,
        recipient_count: recipients.len(),
        recipients,
        total_amount,
    })
}

fn check_cap(category_name: &str, cap: i64, amount: i64) -> Result<(), DatabaseError> {
    if amount > cap {
        return Err(DatabaseError::Validation(format!(
            "amount {} exceeds cap {} of category '{}'",
            format_amount(amount),
            format_amount(cap),
            category_name
        )));
    }
    Ok(())
}

/// Formats minor units as "123.45". Presentation only; all arithmetic
/// stays in integers.
pub fn format_amount(minor: i64) -> String {
    format!("{}.{:02}", minor / 100, (minor % 100).abs())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::models::enums::StudentStatus;
    use crate::models::{AcademicYear, Category, CategoryAssignment, Direction, School, Student, StudentGroup};

    /// Seeds one school/direction/group/student, a 500.00 cap category
    /// with the student assigned, and the 2025/2026 academic year.
    pub(crate) struct Fixture {
        pub student_id: Uuid,
        pub category_id: Uuid,
        pub year_id: Uuid,
    }

    pub(crate) fn seed(conn: &Connection) -> Fixture {
        let school = School {
            id: Uuid::new_v4(),
            name: "Faculty of Mathematics".into(),
            abbreviation: "FM".into(),
        };
        db::insert_school(conn, &school).unwrap();

        let direction = Direction {
            id: Uuid::new_v4(),
            school_id: school.id,
            name: "Informatics".into(),
            code: Some("INF".into()),
        };
        db::insert_direction(conn, &direction).unwrap();

        let group = StudentGroup {
            id: Uuid::new_v4(),
            direction_id: direction.id,
            name: "3".into(),
        };
        db::insert_group(conn, &group).unwrap();

        let student = Student {
            id: Uuid::new_v4(),
            group_id: group.id,
            faculty_number: "45123".into(),
            first_name: "Maria".into(),
            middle_name: None,
            last_name: "Petrova".into(),
            status: StudentStatus::Active,
        };
        db::insert_student(conn, &student).unwrap();

        let category = Category {
            id: Uuid::new_v4(),
            name: "Social".into(),
            description: None,
            monthly_cap: 50_000,
        };
        db::insert_category(conn, &category).unwrap();

        db::insert_assignment(
            conn,
            &CategoryAssignment {
                id: Uuid::new_v4(),
                student_id: student.id,
                category_id: category.id,
            },
        )
        .unwrap();

        let year = AcademicYear {
            id: Uuid::new_v4(),
            first_year: 2025,
            is_active: true,
        };
        db::insert_academic_year(conn, &year).unwrap();

        Fixture {
            student_id: student.id,
            category_id: category.id,
            year_id: year.id,
        }
    }

    fn new_record(fx: &Fixture, month: u32, amount: i64) -> NewAidRecord {
        NewAidRecord {
            student_id: fx.student_id,
            category_id: fx.category_id,
            academic_year_id: fx.year_id,
            month,
            amount,
            note: None,
        }
    }

    #[test]
    fn records_valid_aid() {
        let conn = open_memory_database().unwrap();
        let fx = seed(&conn);

        let record = record_aid(&conn, &new_record(&fx, 10, 20_000)).unwrap();
        assert_eq!(record.amount, 20_000);
        assert!(db::aid_record_exists(&conn, &fx.student_id, &fx.category_id, &fx.year_id, 10).unwrap());
    }

    #[test]
    fn rejects_month_out_of_range() {
        let conn = open_memory_database().unwrap();
        let fx = seed(&conn);

        let err = record_aid(&conn, &new_record(&fx, 13, 10_000)).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[test]
    fn rejects_non_positive_amount() {
        let conn = open_memory_database().unwrap();
        let fx = seed(&conn);

        assert!(record_aid(&conn, &new_record(&fx, 10, 0)).is_err());
        assert!(record_aid(&conn, &new_record(&fx, 10, -500)).is_err());
    }

    #[test]
    fn rejects_amount_over_cap() {
        let conn = open_memory_database().unwrap();
        let fx = seed(&conn);

        let err = record_aid(&conn, &new_record(&fx, 10, 50_001)).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
        // Exactly at cap is fine
        assert!(record_aid(&conn, &new_record(&fx, 10, 50_000)).is_ok());
    }

    #[test]
    fn rejects_unassigned_category() {
        let conn = open_memory_database().unwrap();
        let fx = seed(&conn);

        let other = Category {
            id: Uuid::new_v4(),
            name: "Orphan".into(),
            description: None,
            monthly_cap: 100_000,
        };
        db::insert_category(&conn, &other).unwrap();

        let mut new = new_record(&fx, 10, 10_000);
        new.category_id = other.id;
        let err = record_aid(&conn, &new).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[test]
    fn rejects_duplicate_month() {
        let conn = open_memory_database().unwrap();
        let fx = seed(&conn);

        record_aid(&conn, &new_record(&fx, 11, 10_000)).unwrap();
        let err = record_aid(&conn, &new_record(&fx, 11, 15_000)).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
        // Another month is a separate grant
        assert!(record_aid(&conn, &new_record(&fx, 12, 15_000)).is_ok());
    }

    #[test]
    fn update_rechecks_cap() {
        let conn = open_memory_database().unwrap();
        let fx = seed(&conn);

        let record = record_aid(&conn, &new_record(&fx, 10, 10_000)).unwrap();
        let updated = update_aid_amount(&conn, &record.id, 30_000, Some("raised".into())).unwrap();
        assert_eq!(updated.amount, 30_000);

        let err = update_aid_amount(&conn, &record.id, 60_000, None).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[test]
    fn monthly_summary_totals_and_calendar_year() {
        let conn = open_memory_database().unwrap();
        let fx = seed(&conn);

        record_aid(&conn, &new_record(&fx, 10, 20_000)).unwrap();

        let summary = monthly_summary(&conn, &fx.year_id, 10).unwrap();
        assert_eq!(summary.recipient_count, 1);
        assert_eq!(summary.total_amount, 20_000);
        assert_eq!(summary.calendar_year, 2025);
        assert_eq!(summary.academic_year_label, "2025/2026");
        assert_eq!(summary.recipients[0].faculty_number, "45123");

        // Spring month maps into the second calendar year
        let spring = monthly_summary(&conn, &fx.year_id, 3).unwrap();
        assert_eq!(spring.calendar_year, 2026);
        assert_eq!(spring.recipient_count, 0);
        assert_eq!(spring.total_amount, 0);
    }

    #[test]
    fn year_total_sums_across_months() {
        let conn = open_memory_database().unwrap();
        let fx = seed(&conn);

        record_aid(&conn, &new_record(&fx, 10, 20_000)).unwrap();
        record_aid(&conn, &new_record(&fx, 11, 15_000)).unwrap();

        let total = db::get_student_year_total(&conn, &fx.student_id, &fx.year_id).unwrap();
        assert_eq!(total, 35_000);
    }

    #[test]
    fn format_amount_pads_minor_units() {
        assert_eq!(format_amount(12_345), "123.45");
        assert_eq!(format_amount(500), "5.00");
        assert_eq!(format_amount(7), "0.07");
    }
}
