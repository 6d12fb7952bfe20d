use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aid reason category with a per-month amount cap (minor units).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub monthly_cap: i64,
}

/// Eligibility assignment: the student may receive aid under the category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub category_id: Uuid,
}
