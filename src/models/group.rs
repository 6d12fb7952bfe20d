use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentGroup {
    pub id: Uuid,
    pub direction_id: Uuid,
    pub name: String,
}
