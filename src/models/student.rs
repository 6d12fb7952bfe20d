use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::StudentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub group_id: Uuid,
    pub faculty_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub status: StudentStatus,
}

impl Student {
    /// Display name: "First [Middle] Last".
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(mid) => format!("{} {} {}", self.first_name, mid, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// Student with organisational context, for list views and protocols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRow {
    pub student: Student,
    pub group_name: String,
    pub direction_name: String,
    pub school_name: String,
    pub school_abbreviation: String,
}
