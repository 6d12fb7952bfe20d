use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named value substituted into protocol templates.
/// The stored LaTeX template lives under the reserved name "protocol.latex".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub id: Uuid,
    pub name: String,
    pub value: String,
}

/// Reserved name for the stored LaTeX protocol template.
pub const PROTOCOL_TEMPLATE_NAME: &str = "protocol.latex";
