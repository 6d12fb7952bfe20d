//! Academic year endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::AcademicYear;

#[derive(Deserialize)]
pub struct AcademicYearPayload {
    /// First calendar year: 2025 means "2025/2026".
    pub first_year: i32,
}

/// Academic year with its display label.
#[derive(Serialize)]
pub struct AcademicYearView {
    #[serde(flatten)]
    pub year: AcademicYear,
    pub label: String,
}

impl From<AcademicYear> for AcademicYearView {
    fn from(year: AcademicYear) -> Self {
        let label = year.label();
        Self { year, label }
    }
}

/// `GET /api/academic-years` — newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<AcademicYearView>>, ApiError> {
    let conn = ctx.core.open_db()?;
    let years = db::get_all_academic_years(&conn)?
        .into_iter()
        .map(AcademicYearView::from)
        .collect();
    Ok(Json(years))
}

/// `POST /api/academic-years`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<AcademicYearPayload>,
) -> Result<(StatusCode, Json<AcademicYearView>), ApiError> {
    if !(1900..=3000).contains(&payload.first_year) {
        return Err(ApiError::BadRequest(format!(
            "implausible first year: {}",
            payload.first_year
        )));
    }
    let conn = ctx.core.open_db()?;
    let year = AcademicYear {
        id: Uuid::new_v4(),
        first_year: payload.first_year,
        is_active: false,
    };
    db::insert_academic_year(&conn, &year)?;
    Ok((StatusCode::CREATED, Json(year.into())))
}

/// `GET /api/academic-years/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<AcademicYearView>, ApiError> {
    let id = parse_id(&id, "academic year")?;
    let conn = ctx.core.open_db()?;
    let year = db::get_academic_year(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Academic year not found".into()))?;
    Ok(Json(year.into()))
}

/// `PUT /api/academic-years/:id` — corrects a mistyped first year.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<AcademicYearPayload>,
) -> Result<Json<AcademicYearView>, ApiError> {
    if !(1900..=3000).contains(&payload.first_year) {
        return Err(ApiError::BadRequest(format!(
            "implausible first year: {}",
            payload.first_year
        )));
    }
    let id = parse_id(&id, "academic year")?;
    let conn = ctx.core.open_db()?;
    let mut year = db::get_academic_year(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Academic year not found".into()))?;
    year.first_year = payload.first_year;
    db::update_academic_year(&conn, &year)?;
    Ok(Json(year.into()))
}

/// `POST /api/academic-years/:id/activate` — at most one active year.
pub async fn activate(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<AcademicYearView>, ApiError> {
    let id = parse_id(&id, "academic year")?;
    let conn = ctx.core.open_db()?;
    db::set_active_academic_year(&conn, &id)?;
    let year = db::get_academic_year(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Academic year not found".into()))?;
    Ok(Json(year.into()))
}

/// `DELETE /api/academic-years/:id` — cascades to its aid records.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "academic year")?;
    let conn = ctx.core.open_db()?;
    db::delete_academic_year(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
