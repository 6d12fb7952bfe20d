//! Aid category endpoints. The monthly cap is in minor units.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::Category;

#[derive(Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub description: Option<String>,
    pub monthly_cap: i64,
}

fn validate(payload: &CategoryPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("category name must not be empty".into()));
    }
    if payload.monthly_cap <= 0 {
        return Err(ApiError::BadRequest(format!(
            "monthly cap must be positive, got {}",
            payload.monthly_cap
        )));
    }
    Ok(())
}

/// `GET /api/categories`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Category>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(db::get_all_categories(&conn)?))
}

/// `POST /api/categories`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    validate(&payload)?;
    let conn = ctx.core.open_db()?;
    let category = Category {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        description: payload.description,
        monthly_cap: payload.monthly_cap,
    };
    db::insert_category(&conn, &category)?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /api/categories/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id, "category")?;
    let conn = ctx.core.open_db()?;
    let category = db::get_category(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;
    Ok(Json(category))
}

/// `PUT /api/categories/:id` — lowering the cap does not touch already
/// recorded grants; it binds future ones.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id, "category")?;
    validate(&payload)?;
    let conn = ctx.core.open_db()?;
    let category = Category {
        id,
        name: payload.name.trim().to_string(),
        description: payload.description,
        monthly_cap: payload.monthly_cap,
    };
    db::update_category(&conn, &category)?;
    Ok(Json(category))
}

/// `DELETE /api/categories/:id` — rejected while aid records reference it.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "category")?;
    let conn = ctx.core.open_db()?;
    db::delete_category(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
