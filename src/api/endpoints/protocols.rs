//! Protocol export endpoints.
//!
//! `GET /api/protocols/:year_id/:month` returns the assembled protocol
//! as JSON; `GET /api/protocols/:year_id/:month/:format` renders the
//! document (`pdf` or `latex`) for download.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::enums::DocumentFormat;
use crate::protocol::{self, ProtocolData};

fn build(
    ctx: &ApiContext,
    year_id: &str,
    month: u32,
) -> Result<(rusqlite::Connection, ProtocolData), ApiError> {
    let year_id = parse_id(year_id, "academic year")?;
    let conn = ctx.core.open_db()?;
    let data = protocol::build_protocol(&conn, &year_id, month)?;
    Ok((conn, data))
}

/// `GET /api/protocols/:year_id/:month` — assembled protocol as JSON.
pub async fn summary(
    State(ctx): State<ApiContext>,
    Path((year_id, month)): Path<(String, u32)>,
) -> Result<Json<ProtocolData>, ApiError> {
    let (_conn, data) = build(&ctx, &year_id, month)?;
    Ok(Json(data))
}

/// `GET /api/protocols/:year_id/:month/:format` — rendered document.
///
/// An unknown format segment is rejected before any database work.
pub async fn download(
    State(ctx): State<ApiContext>,
    Path((year_id, month, format)): Path<(String, u32, String)>,
) -> Result<Response, ApiError> {
    let format = DocumentFormat::from_str(&format)?;
    let (conn, data) = build(&ctx, &year_id, month)?;

    match format {
        DocumentFormat::Pdf => {
            let bytes = protocol::render_pdf(&data)?;
            let filename = format!(
                "protocol-{}-{:02}.pdf",
                data.academic_year_label.replace('/', "-"),
                data.month
            );

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                bytes,
            )
                .into_response())
        }
        DocumentFormat::Latex => {
            let tex = protocol::render_latex(&conn, &data)?;

            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string())],
                tex,
            )
                .into_response())
        }
    }
}
