//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub active_academic_year: Option<String>,
}

/// `GET /api/health` — connection and database check.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let active = db::get_active_academic_year(&conn)?.map(|y| y.label());

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        active_academic_year: active,
    }))
}
