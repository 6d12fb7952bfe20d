use uuid::Uuid;

use super::enums::StudentStatus;

#[derive(Debug, Default)]
pub struct StudentFilter {
    pub group_id: Option<Uuid>,
    pub direction_id: Option<Uuid>,
    pub school_id: Option<Uuid>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Default)]
pub struct AidRecordFilter {
    pub academic_year_id: Option<Uuid>,
    pub month: Option<u32>,
    pub student_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}
