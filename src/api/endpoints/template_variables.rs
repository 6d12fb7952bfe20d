//! Template variable endpoints.
//!
//! Plain name/value pairs substituted into protocol templates. The
//! stored LaTeX template itself is editable here under its reserved
//! name "protocol.latex".

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::TemplateVariable;

#[derive(Deserialize)]
pub struct TemplateVariablePayload {
    pub name: String,
    pub value: String,
}

/// `GET /api/template-variables`
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<TemplateVariable>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(db::get_all_template_variables(&conn)?))
}

/// `POST /api/template-variables` — upsert by name.
pub async fn upsert(
    State(ctx): State<ApiContext>,
    Json(payload): Json<TemplateVariablePayload>,
) -> Result<(StatusCode, Json<TemplateVariable>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("variable name must not be empty".into()));
    }
    let conn = ctx.core.open_db()?;
    let var = db::upsert_template_variable(&conn, name, &payload.value)?;
    Ok((StatusCode::CREATED, Json(var)))
}

/// `GET /api/template-variables/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<TemplateVariable>, ApiError> {
    let id = parse_id(&id, "template variable")?;
    let conn = ctx.core.open_db()?;
    let var = db::get_template_variable(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Template variable not found".into()))?;
    Ok(Json(var))
}

/// `PUT /api/template-variables/:id` — rename and/or change the value.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<TemplateVariablePayload>,
) -> Result<Json<TemplateVariable>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("variable name must not be empty".into()));
    }
    let id = parse_id(&id, "template variable")?;
    let conn = ctx.core.open_db()?;
    let var = TemplateVariable {
        id,
        name: name.to_string(),
        value: payload.value,
    };
    db::update_template_variable(&conn, &var)?;
    Ok(Json(var))
}

/// `DELETE /api/template-variables/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "template variable")?;
    let conn = ctx.core.open_db()?;
    db::delete_template_variable(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
