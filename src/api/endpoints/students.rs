//! Student endpoints, including category eligibility assignments.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::enums::StudentStatus;
use crate::models::{Category, CategoryAssignment, Student, StudentFilter, StudentRow};

#[derive(Deserialize)]
pub struct StudentPayload {
    pub group_id: Uuid,
    pub faculty_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Defaults to "active" when omitted.
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct StudentListQuery {
    pub group: Option<String>,
    pub direction: Option<String>,
    pub school: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

fn status_from_payload(raw: Option<&str>) -> Result<StudentStatus, ApiError> {
    match raw {
        Some(s) => StudentStatus::from_str(s).map_err(ApiError::from),
        None => Ok(StudentStatus::Active),
    }
}

/// `GET /api/students` — list with group/direction/school context.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<StudentListQuery>,
) -> Result<Json<Vec<StudentRow>>, ApiError> {
    let filter = StudentFilter {
        group_id: query.group.as_deref().map(|s| parse_id(s, "group")).transpose()?,
        direction_id: query
            .direction
            .as_deref()
            .map(|s| parse_id(s, "direction"))
            .transpose()?,
        school_id: query.school.as_deref().map(|s| parse_id(s, "school")).transpose()?,
        status: query
            .status
            .as_deref()
            .map(StudentStatus::from_str)
            .transpose()?,
        search: query.search,
    };
    let conn = ctx.core.open_db()?;
    Ok(Json(db::list_students(&conn, &filter)?))
}

/// `POST /api/students`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<StudentPayload>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    if payload.faculty_number.trim().is_empty() {
        return Err(ApiError::BadRequest("faculty number must not be empty".into()));
    }
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(ApiError::BadRequest("student name must not be empty".into()));
    }
    let status = status_from_payload(payload.status.as_deref())?;

    let conn = ctx.core.open_db()?;
    if db::get_group(&conn, &payload.group_id)?.is_none() {
        return Err(ApiError::NotFound("Group not found".into()));
    }
    if db::get_student_by_faculty_number(&conn, payload.faculty_number.trim())?.is_some() {
        return Err(ApiError::Conflict(format!(
            "faculty number {} already registered",
            payload.faculty_number.trim()
        )));
    }

    let student = Student {
        id: Uuid::new_v4(),
        group_id: payload.group_id,
        faculty_number: payload.faculty_number.trim().to_string(),
        first_name: payload.first_name.trim().to_string(),
        middle_name: payload.middle_name,
        last_name: payload.last_name.trim().to_string(),
        status,
    };
    db::insert_student(&conn, &student)?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// `GET /api/students/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_id(&id, "student")?;
    let conn = ctx.core.open_db()?;
    let student = db::get_student(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
    Ok(Json(student))
}

/// `PUT /api/students/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<StudentPayload>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_id(&id, "student")?;
    if payload.faculty_number.trim().is_empty() {
        return Err(ApiError::BadRequest("faculty number must not be empty".into()));
    }
    let status = status_from_payload(payload.status.as_deref())?;

    let conn = ctx.core.open_db()?;
    let student = Student {
        id,
        group_id: payload.group_id,
        faculty_number: payload.faculty_number.trim().to_string(),
        first_name: payload.first_name.trim().to_string(),
        middle_name: payload.middle_name,
        last_name: payload.last_name.trim().to_string(),
        status,
    };
    db::update_student(&conn, &student)?;
    Ok(Json(student))
}

/// `DELETE /api/students/:id` — cascades to assignments and aid records.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "student")?;
    let conn = ctx.core.open_db()?;
    db::delete_student(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Category assignments ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AssignPayload {
    pub category_id: Uuid,
}

/// `GET /api/students/:id/categories`
pub async fn list_categories(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let id = parse_id(&id, "student")?;
    let conn = ctx.core.open_db()?;
    if db::get_student(&conn, &id)?.is_none() {
        return Err(ApiError::NotFound("Student not found".into()));
    }
    Ok(Json(db::get_student_categories(&conn, &id)?))
}

/// `POST /api/students/:id/categories` — make the student eligible.
pub async fn assign_category(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<AssignPayload>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "student")?;
    let conn = ctx.core.open_db()?;
    if db::get_student(&conn, &id)?.is_none() {
        return Err(ApiError::NotFound("Student not found".into()));
    }
    if db::get_category(&conn, &payload.category_id)?.is_none() {
        return Err(ApiError::NotFound("Category not found".into()));
    }
    if db::assignment_exists(&conn, &id, &payload.category_id)? {
        return Err(ApiError::Conflict("student already assigned to category".into()));
    }
    db::insert_assignment(
        &conn,
        &CategoryAssignment {
            id: Uuid::new_v4(),
            student_id: id,
            category_id: payload.category_id,
        },
    )?;
    Ok(StatusCode::CREATED)
}

/// `DELETE /api/students/:id/categories/:category_id`
pub async fn unassign_category(
    State(ctx): State<ApiContext>,
    Path((id, category_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "student")?;
    let category_id = parse_id(&category_id, "category")?;
    let conn = ctx.core.open_db()?;
    db::delete_assignment(&conn, &id, &category_id)?;
    Ok(StatusCode::NO_CONTENT)
}
