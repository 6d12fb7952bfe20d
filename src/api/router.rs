//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`: one CRUD quintet per entity, the
//! category assignment sub-resource, aid records, and protocol export.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
///
/// Handlers use `State<ApiContext>`; the request-log middleware and a
/// permissive CORS layer (AJAX clients on another origin) wrap all
/// routes.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/schools",
            get(endpoints::schools::list).post(endpoints::schools::create),
        )
        .route(
            "/schools/:id",
            get(endpoints::schools::get)
                .put(endpoints::schools::update)
                .delete(endpoints::schools::delete),
        )
        .route(
            "/directions",
            get(endpoints::directions::list).post(endpoints::directions::create),
        )
        .route(
            "/directions/:id",
            get(endpoints::directions::get)
                .put(endpoints::directions::update)
                .delete(endpoints::directions::delete),
        )
        .route(
            "/groups",
            get(endpoints::groups::list).post(endpoints::groups::create),
        )
        .route(
            "/groups/:id",
            get(endpoints::groups::get)
                .put(endpoints::groups::update)
                .delete(endpoints::groups::delete),
        )
        .route(
            "/students",
            get(endpoints::students::list).post(endpoints::students::create),
        )
        .route(
            "/students/:id",
            get(endpoints::students::get)
                .put(endpoints::students::update)
                .delete(endpoints::students::delete),
        )
        .route(
            "/students/:id/categories",
            get(endpoints::students::list_categories)
                .post(endpoints::students::assign_category),
        )
        .route(
            "/students/:id/categories/:category_id",
            delete(endpoints::students::unassign_category),
        )
        .route(
            "/categories",
            get(endpoints::categories::list).post(endpoints::categories::create),
        )
        .route(
            "/categories/:id",
            get(endpoints::categories::get)
                .put(endpoints::categories::update)
                .delete(endpoints::categories::delete),
        )
        .route(
            "/academic-years",
            get(endpoints::academic_years::list).post(endpoints::academic_years::create),
        )
        .route(
            "/academic-years/:id",
            get(endpoints::academic_years::get)
                .put(endpoints::academic_years::update)
                .delete(endpoints::academic_years::delete),
        )
        .route(
            "/academic-years/:id/activate",
            post(endpoints::academic_years::activate),
        )
        .route(
            "/template-variables",
            get(endpoints::template_variables::list)
                .post(endpoints::template_variables::upsert),
        )
        .route(
            "/template-variables/:id",
            get(endpoints::template_variables::get)
                .put(endpoints::template_variables::update)
                .delete(endpoints::template_variables::delete),
        )
        .route(
            "/aid-records",
            get(endpoints::aid_records::list).post(endpoints::aid_records::create),
        )
        .route(
            "/aid-records/:id",
            axum::routing::put(endpoints::aid_records::update)
                .delete(endpoints::aid_records::delete),
        )
        .route(
            "/protocols/:year_id/:month",
            get(endpoints::protocols::summary),
        )
        .route(
            "/protocols/:year_id/:month/:format",
            get(endpoints::protocols::download),
        )
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::log::log_request))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// CoreState backed by a temp directory database.
    /// The tempdir guard must be kept alive for the duration of the test.
    fn test_core_state() -> (Arc<CoreState>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let core = CoreState::at(tmp.path().join("test.db")).unwrap();
        (Arc::new(core), tmp)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core);

        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["active_academic_year"].is_null());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core);

        let response = app.oneshot(get_request("/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn school_crud_roundtrip() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core);

        // Create
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/schools",
                serde_json::json!({"name": "Faculty of Physics", "abbreviation": "FP"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        // Read back
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/schools/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["name"], "Faculty of Physics");

        // Update
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/schools/{id}"),
                serde_json::json!({"name": "Faculty of Physics and Astronomy", "abbreviation": "FPA"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Delete
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/schools/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Gone
        let response = app
            .oneshot(get_request(&format!("/api/schools/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_school_name_is_conflict() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core);

        let payload = serde_json::json!({"name": "Law", "abbreviation": "L"});
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/schools", payload.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(json_request("POST", "/api/schools", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_uuid_is_bad_request() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core);

        let response = app
            .oneshot(get_request("/api/schools/not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn direction_requires_existing_school() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/directions",
                serde_json::json!({
                    "school_id": uuid::Uuid::new_v4(),
                    "name": "Informatics"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Full data-entry flow: hierarchy → category → year → assignment →
    /// aid record → protocol export.
    #[tokio::test]
    async fn full_flow_to_protocol_pdf() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core);

        let post = |uri: &str, body: serde_json::Value| {
            let app = app.clone();
            let uri = uri.to_string();
            async move {
                let response = app.oneshot(json_request("POST", &uri, body)).await.unwrap();
                assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
                json_body(response).await
            }
        };

        let school = post(
            "/api/schools",
            serde_json::json!({"name": "Economics", "abbreviation": "EC"}),
        )
        .await;
        let direction = post(
            "/api/directions",
            serde_json::json!({"school_id": school["id"], "name": "Finance"}),
        )
        .await;
        let group = post(
            "/api/groups",
            serde_json::json!({"direction_id": direction["id"], "name": "2"}),
        )
        .await;
        let student = post(
            "/api/students",
            serde_json::json!({
                "group_id": group["id"],
                "faculty_number": "77001",
                "first_name": "Elena",
                "last_name": "Georgieva"
            }),
        )
        .await;
        let category = post(
            "/api/categories",
            serde_json::json!({"name": "Social", "monthly_cap": 40000}),
        )
        .await;
        let year = post(
            "/api/academic-years",
            serde_json::json!({"first_year": 2025}),
        )
        .await;

        // Assign category, then record October aid
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/students/{}/categories", student["id"].as_str().unwrap()),
                serde_json::json!({"category_id": category["id"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let record = post(
            "/api/aid-records",
            serde_json::json!({
                "student_id": student["id"],
                "category_id": category["id"],
                "academic_year_id": year["id"],
                "month": 10,
                "amount": 25000
            }),
        )
        .await;
        assert_eq!(record["amount"], 25000);

        // Over-cap record is rejected
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/aid-records",
                serde_json::json!({
                    "student_id": student["id"],
                    "category_id": category["id"],
                    "academic_year_id": year["id"],
                    "month": 11,
                    "amount": 40001
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Protocol summary
        let year_id = year["id"].as_str().unwrap();
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/protocols/{year_id}/10")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let protocol = json_body(response).await;
        assert_eq!(protocol["recipient_count"], 1);
        assert_eq!(protocol["calendar_year"], 2025);

        // PDF download
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/protocols/{year_id}/10/pdf")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/pdf"
        );
        let bytes = to_bytes(response.into_body(), 10 * 1024 * 1024).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        // LaTeX download
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/protocols/{year_id}/10/latex")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let tex = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let tex = String::from_utf8(tex.to_vec()).unwrap();
        assert!(tex.contains("Elena Georgieva"));
        assert!(tex.contains("250.00"));
    }

    #[tokio::test]
    async fn protocol_month_out_of_range_is_bad_request() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core.clone());

        let conn = core.open_db().unwrap();
        let year = crate::models::AcademicYear {
            id: uuid::Uuid::new_v4(),
            first_year: 2025,
            is_active: false,
        };
        crate::db::insert_academic_year(&conn, &year).unwrap();

        let response = app
            .oneshot(get_request(&format!("/api/protocols/{}/13", year.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn activate_academic_year_is_exclusive() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core.clone());

        let conn = core.open_db().unwrap();
        let mut ids = Vec::new();
        for first_year in [2024, 2025] {
            let year = crate::models::AcademicYear {
                id: uuid::Uuid::new_v4(),
                first_year,
                is_active: false,
            };
            crate::db::insert_academic_year(&conn, &year).unwrap();
            ids.push(year.id);
        }

        for id in &ids {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    &format!("/api/academic-years/{id}/activate"),
                    serde_json::json!({}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let active = crate::db::get_active_academic_year(&conn).unwrap().unwrap();
        assert_eq!(active.id, ids[1]);
    }

    #[tokio::test]
    async fn academic_year_update_changes_label() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/academic-years",
                serde_json::json!({"first_year": 2025}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_str().unwrap().to_string();

        // Correct a mistyped year
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/academic-years/{id}"),
                serde_json::json!({"first_year": 2026}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["label"], "2026/2027");

        let response = app
            .oneshot(get_request(&format!("/api/academic-years/{id}")))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["first_year"], 2026);
    }

    #[tokio::test]
    async fn template_variable_update_by_id() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/template-variables",
                serde_json::json!({"name": "dean", "value": "Prof. Ivanov"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/template-variables/{id}"),
                serde_json::json!({"name": "dean", "value": "Prof. Stoyanova"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/template-variables/{id}")))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["value"], "Prof. Stoyanova");

        // Unknown id is 404
        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/template-variables/{}", uuid::Uuid::new_v4()),
                serde_json::json!({"name": "dean", "value": "x"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Year-wide listings come back September-first, regardless of
    /// insertion order.
    #[tokio::test]
    async fn year_listing_is_in_academic_order() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core.clone());

        let conn = core.open_db().unwrap();
        let fx = crate::aid::tests::seed(&conn);
        for month in [2, 10, 9] {
            crate::aid::record_aid(
                &conn,
                &crate::aid::NewAidRecord {
                    student_id: fx.student_id,
                    category_id: fx.category_id,
                    academic_year_id: fx.year_id,
                    month,
                    amount: 10_000,
                    note: None,
                },
            )
            .unwrap();
        }

        let response = app
            .oneshot(get_request(&format!("/api/aid-records?year={}", fx.year_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let records = json_body(response).await;
        let months: Vec<u64> = records
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["month"].as_u64().unwrap())
            .collect();
        assert_eq!(months, vec![9, 10, 2]);
    }

    /// A category with recorded aid is referenced by a plain foreign
    /// key and cannot be deleted.
    #[tokio::test]
    async fn category_with_recorded_aid_cannot_be_deleted() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core.clone());

        let conn = core.open_db().unwrap();
        let fx = crate::aid::tests::seed(&conn);
        crate::aid::record_aid(
            &conn,
            &crate::aid::NewAidRecord {
                student_id: fx.student_id,
                category_id: fx.category_id,
                academic_year_id: fx.year_id,
                month: 10,
                amount: 10_000,
                note: None,
            },
        )
        .unwrap();
        drop(conn);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/categories/{}", fx.category_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_protocol_format_is_bad_request() {
        let (core, _tmp) = test_core_state();
        let app = api_router(core.clone());

        let conn = core.open_db().unwrap();
        let year = crate::models::AcademicYear {
            id: uuid::Uuid::new_v4(),
            first_year: 2025,
            is_active: false,
        };
        crate::db::insert_academic_year(&conn, &year).unwrap();

        let response = app
            .oneshot(get_request(&format!("/api/protocols/{}/10/docx", year.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }
}
