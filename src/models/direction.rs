use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Study direction (program) within a school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Direction {
    pub id: Uuid,
    pub school_id: Uuid,
    pub name: String,
    pub code: Option<String>,
}
