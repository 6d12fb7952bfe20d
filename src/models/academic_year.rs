use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DatabaseError;

/// Months in academic order: September first, August last.
pub const ACADEMIC_MONTH_ORDER: [u32; 12] = [9, 10, 11, 12, 1, 2, 3, 4, 5, 6, 7, 8];

/// An academic year "N/N+1", identified by its first calendar year N.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: Uuid,
    pub first_year: i32,
    pub is_active: bool,
}

impl AcademicYear {
    /// Label like "2025/2026".
    pub fn label(&self) -> String {
        format!("{}/{}", self.first_year, self.first_year + 1)
    }

    /// Calendar year a given month of this academic year falls in:
    /// September–December belong to the first year, January–August to
    /// the second.
    pub fn calendar_year_of(&self, month: u32) -> Result<i32, DatabaseError> {
        validate_month(month)?;
        if month >= 9 {
            Ok(self.first_year)
        } else {
            Ok(self.first_year + 1)
        }
    }
}

/// Reject months outside 1..=12.
pub fn validate_month(month: u32) -> Result<(), DatabaseError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(DatabaseError::Validation(format!("month out of range: {month}")))
    }
}

/// Position of a month in the academic ordering (0 = September).
pub fn academic_month_index(month: u32) -> usize {
    ACADEMIC_MONTH_ORDER
        .iter()
        .position(|&m| m == month)
        .unwrap_or(0)
}

/// English month name for protocol headers.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(first: i32) -> AcademicYear {
        AcademicYear {
            id: Uuid::new_v4(),
            first_year: first,
            is_active: false,
        }
    }

    #[test]
    fn label_spans_two_years() {
        assert_eq!(year(2025).label(), "2025/2026");
    }

    #[test]
    fn autumn_months_fall_in_first_year() {
        let y = year(2025);
        for m in [9, 10, 11, 12] {
            assert_eq!(y.calendar_year_of(m).unwrap(), 2025);
        }
    }

    #[test]
    fn spring_months_fall_in_second_year() {
        let y = year(2025);
        for m in 1..=8 {
            assert_eq!(y.calendar_year_of(m).unwrap(), 2026);
        }
    }

    #[test]
    fn month_zero_and_thirteen_rejected() {
        let y = year(2025);
        assert!(y.calendar_year_of(0).is_err());
        assert!(y.calendar_year_of(13).is_err());
    }

    #[test]
    fn academic_ordering_starts_in_september() {
        assert_eq!(academic_month_index(9), 0);
        assert_eq!(academic_month_index(8), 11);
        assert!(academic_month_index(12) < academic_month_index(1));
    }
}
