//! API endpoint handlers.
//!
//! One module per entity, plus protocol export and health.

pub mod academic_years;
pub mod aid_records;
pub mod categories;
pub mod directions;
pub mod groups;
pub mod health;
pub mod protocols;
pub mod schools;
pub mod students;
pub mod template_variables;

use uuid::Uuid;

use crate::api::error::ApiError;

/// Parse a path segment as a UUID, rejecting junk with a 400.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("Invalid {what} ID: {e}")))
}
