use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One granted aid: student × category × academic year × month.
/// Amount is in minor units (stotinki).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AidRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub category_id: Uuid,
    pub academic_year_id: Uuid,
    pub month: u32,
    pub amount: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
