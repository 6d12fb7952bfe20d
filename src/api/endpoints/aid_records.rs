//! Aid record endpoints — the monthly grants themselves.
//!
//! Creation goes through `aid::record_aid`, which enforces month range,
//! category eligibility, the cap and the one-grant-per-month rule.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::aid;
use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{academic_month_index, AidRecord, AidRecordFilter};

#[derive(Deserialize)]
pub struct AidRecordListQuery {
    pub year: Option<String>,
    pub month: Option<u32>,
    pub student: Option<String>,
    pub category: Option<String>,
}

/// `GET /api/aid-records?year=&month=&student=&category=`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<AidRecordListQuery>,
) -> Result<Json<Vec<AidRecord>>, ApiError> {
    let filter = AidRecordFilter {
        academic_year_id: query
            .year
            .as_deref()
            .map(|s| parse_id(s, "academic year"))
            .transpose()?,
        month: query.month,
        student_id: query
            .student
            .as_deref()
            .map(|s| parse_id(s, "student"))
            .transpose()?,
        category_id: query
            .category
            .as_deref()
            .map(|s| parse_id(s, "category"))
            .transpose()?,
    };
    let conn = ctx.core.open_db()?;
    let mut records = db::list_aid_records(&conn, &filter)?;
    // Year-wide listings read in academic order, September first
    if filter.month.is_none() {
        records.sort_by_key(|r| academic_month_index(r.month));
    }
    Ok(Json(records))
}

/// `POST /api/aid-records`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<aid::NewAidRecord>,
) -> Result<(StatusCode, Json<AidRecord>), ApiError> {
    let conn = ctx.core.open_db()?;
    let record = aid::record_aid(&conn, &payload)?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Deserialize)]
pub struct AidRecordUpdatePayload {
    pub amount: i64,
    pub note: Option<String>,
}

/// `PUT /api/aid-records/:id` — amount/note only; moving a grant to a
/// different month or category is delete + create.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<AidRecordUpdatePayload>,
) -> Result<Json<AidRecord>, ApiError> {
    let id = parse_id(&id, "aid record")?;
    let conn = ctx.core.open_db()?;
    let record = aid::update_aid_amount(&conn, &id, payload.amount, payload.note)?;
    Ok(Json(record))
}

/// `DELETE /api/aid-records/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "aid record")?;
    let conn = ctx.core.open_db()?;
    db::delete_aid_record(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
