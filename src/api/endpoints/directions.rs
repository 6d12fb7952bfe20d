//! Direction (program) endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::Direction;

#[derive(Deserialize)]
pub struct DirectionPayload {
    pub school_id: Uuid,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Deserialize)]
pub struct DirectionListQuery {
    pub school: Option<String>,
}

/// `GET /api/directions?school=<id>`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<DirectionListQuery>,
) -> Result<Json<Vec<Direction>>, ApiError> {
    let school_id = query
        .school
        .as_deref()
        .map(|s| parse_id(s, "school"))
        .transpose()?;
    let conn = ctx.core.open_db()?;
    Ok(Json(db::get_directions(&conn, school_id.as_ref())?))
}

/// `POST /api/directions`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<DirectionPayload>,
) -> Result<(StatusCode, Json<Direction>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("direction name must not be empty".into()));
    }
    let conn = ctx.core.open_db()?;
    if db::get_school(&conn, &payload.school_id)?.is_none() {
        return Err(ApiError::NotFound("School not found".into()));
    }
    let direction = Direction {
        id: Uuid::new_v4(),
        school_id: payload.school_id,
        name: payload.name.trim().to_string(),
        code: payload.code,
    };
    db::insert_direction(&conn, &direction)?;
    Ok((StatusCode::CREATED, Json(direction)))
}

/// `GET /api/directions/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Direction>, ApiError> {
    let id = parse_id(&id, "direction")?;
    let conn = ctx.core.open_db()?;
    let direction = db::get_direction(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Direction not found".into()))?;
    Ok(Json(direction))
}

/// `PUT /api/directions/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<DirectionPayload>,
) -> Result<Json<Direction>, ApiError> {
    let id = parse_id(&id, "direction")?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("direction name must not be empty".into()));
    }
    let conn = ctx.core.open_db()?;
    let direction = Direction {
        id,
        school_id: payload.school_id,
        name: payload.name.trim().to_string(),
        code: payload.code,
    };
    db::update_direction(&conn, &direction)?;
    Ok(Json(direction))
}

/// `DELETE /api/directions/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "direction")?;
    let conn = ctx.core.open_db()?;
    db::delete_direction(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
