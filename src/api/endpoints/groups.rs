//! Student group endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::StudentGroup;

#[derive(Deserialize)]
pub struct GroupPayload {
    pub direction_id: Uuid,
    pub name: String,
}

#[derive(Deserialize)]
pub struct GroupListQuery {
    pub direction: Option<String>,
}

/// `GET /api/groups?direction=<id>`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<GroupListQuery>,
) -> Result<Json<Vec<StudentGroup>>, ApiError> {
    let direction_id = query
        .direction
        .as_deref()
        .map(|s| parse_id(s, "direction"))
        .transpose()?;
    let conn = ctx.core.open_db()?;
    Ok(Json(db::get_groups(&conn, direction_id.as_ref())?))
}

/// `POST /api/groups`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<GroupPayload>,
) -> Result<(StatusCode, Json<StudentGroup>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("group name must not be empty".into()));
    }
    let conn = ctx.core.open_db()?;
    if db::get_direction(&conn, &payload.direction_id)?.is_none() {
        return Err(ApiError::NotFound("Direction not found".into()));
    }
    let group = StudentGroup {
        id: Uuid::new_v4(),
        direction_id: payload.direction_id,
        name: payload.name.trim().to_string(),
    };
    db::insert_group(&conn, &group)?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// `GET /api/groups/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<StudentGroup>, ApiError> {
    let id = parse_id(&id, "group")?;
    let conn = ctx.core.open_db()?;
    let group = db::get_group(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Group not found".into()))?;
    Ok(Json(group))
}

/// `PUT /api/groups/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<GroupPayload>,
) -> Result<Json<StudentGroup>, ApiError> {
    let id = parse_id(&id, "group")?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("group name must not be empty".into()));
    }
    let conn = ctx.core.open_db()?;
    let group = StudentGroup {
        id,
        direction_id: payload.direction_id,
        name: payload.name.trim().to_string(),
    };
    db::update_group(&conn, &group)?;
    Ok(Json(group))
}

/// `DELETE /api/groups/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "group")?;
    let conn = ctx.core.open_db()?;
    db::delete_group(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
