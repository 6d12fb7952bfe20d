//! School endpoints — top level of the organisational hierarchy.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::School;

#[derive(Deserialize)]
pub struct SchoolPayload {
    pub name: String,
    pub abbreviation: String,
}

/// `GET /api/schools`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<School>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(db::get_all_schools(&conn)?))
}

/// `POST /api/schools`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<SchoolPayload>,
) -> Result<(StatusCode, Json<School>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("school name must not be empty".into()));
    }
    let conn = ctx.core.open_db()?;
    let school = School {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        abbreviation: payload.abbreviation.trim().to_string(),
    };
    db::insert_school(&conn, &school)?;
    Ok((StatusCode::CREATED, Json(school)))
}

/// `GET /api/schools/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<School>, ApiError> {
    let id = parse_id(&id, "school")?;
    let conn = ctx.core.open_db()?;
    let school = db::get_school(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("School not found".into()))?;
    Ok(Json(school))
}

/// `PUT /api/schools/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<SchoolPayload>,
) -> Result<Json<School>, ApiError> {
    let id = parse_id(&id, "school")?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("school name must not be empty".into()));
    }
    let conn = ctx.core.open_db()?;
    let school = School {
        id,
        name: payload.name.trim().to_string(),
        abbreviation: payload.abbreviation.trim().to_string(),
    };
    db::update_school(&conn, &school)?;
    Ok(Json(school))
}

/// `DELETE /api/schools/:id` — cascades to directions, groups, students.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "school")?;
    let conn = ctx.core.open_db()?;
    db::delete_school(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
