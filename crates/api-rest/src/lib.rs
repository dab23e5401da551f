//! # API REST
//!
//! REST API implementation for the triage intake.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, credential headers)
//!
//! Uses `api-shared` for wire types and `triage-core` for every operation.

#![warn(rust_2018_idioms)]

pub mod error;

use api_shared::{
    BookCaseReq, BookCaseRes, CaseRes, ErrorRes, HealthRes, HealthService, ListQueueRes,
    RemoveCaseRes,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use triage_core::{AccessContext, TriageService};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Header carrying the doctor capability token.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TriageService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, book_case, list_queue, remove_case),
    components(schemas(
        HealthRes,
        BookCaseReq,
        BookCaseRes,
        CaseRes,
        ListQueueRes,
        RemoveCaseRes,
        ErrorRes
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(service: Arc<TriageService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cases", post(book_case))
        .route("/cases/:id", delete(remove_case))
        .route("/queue", get(list_queue))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service })
}

/// Builds the per-request access context from the `x-api-key` header, falling back to an
/// `Authorization: Bearer` token.
pub fn access_context(headers: &HeaderMap) -> AccessContext {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match api_key.or(bearer) {
        Some(token) => AccessContext::with_token(token),
        None => AccessContext::anonymous(),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/cases",
    request_body = BookCaseReq,
    responses(
        (status = 201, description = "Case booked", body = BookCaseRes),
        (status = 400, description = "Malformed body, missing subject name or symptoms", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Book a walk-in case
///
/// Scores the reported symptoms, classifies the risk and stores the case. Any caller may
/// book.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not a valid booking, the subject name or the
/// symptom list is empty, or a label contains a comma.
#[axum::debug_handler]
async fn book_case(
    State(state): State<AppState>,
    payload: Result<Json<BookCaseReq>, JsonRejection>,
) -> Result<(StatusCode, Json<BookCaseRes>), ApiError> {
    let Json(req) = payload?;
    let booking = state.service.book_case(&req.subject_name, req.symptoms)?;
    Ok((StatusCode::CREATED, Json(BookCaseRes::from(booking))))
}

#[utoipa::path(
    get,
    path = "/queue",
    responses(
        (status = 200, description = "Open cases, most urgent first", body = ListQueueRes),
        (status = 401, description = "Missing or invalid doctor API key", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List the triage queue
///
/// Requires the doctor API key in `x-api-key` (or `Authorization: Bearer`).
#[axum::debug_handler]
async fn list_queue(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListQueueRes>, ApiError> {
    let cases = state.service.list_queue(&access_context(&headers))?;
    Ok(Json(ListQueueRes::from(cases)))
}

#[utoipa::path(
    delete,
    path = "/cases/{id}",
    params(("id" = i64, Path, description = "Case identity")),
    responses(
        (status = 200, description = "Case marked as consulted", body = RemoveCaseRes),
        (status = 401, description = "Missing or invalid doctor API key", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Mark a case as consulted
///
/// Removes the case from the queue. Removing an id that is not queued is acknowledged the
/// same way.
#[axum::debug_handler]
async fn remove_case(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<RemoveCaseRes>, ApiError> {
    state.service.remove_case(id, &access_context(&headers))?;
    Ok(Json(RemoveCaseRes {
        message: "Case marked as consulted".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::ApiKeyGate;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use triage_core::{CaseStore, RiskClassifier, SeverityScorer, SymptomWeightTable};

    const KEY: &str = "doctor123";

    fn test_app() -> Router {
        let table = SymptomWeightTable::from_pairs([
            ("itching", 1.0),
            ("skin_rash", 3.0),
            ("nodal_skin_eruptions", 4.0),
            ("chest_pain", 7.0),
            ("high_fever", 7.0),
            ("breathlessness", 4.0),
        ])
        .unwrap();
        let service = TriageService::new(
            SeverityScorer::weighted(Arc::new(table)),
            RiskClassifier::default(),
            Arc::new(CaseStore::open_in_memory().unwrap()),
            Arc::new(ApiKeyGate::new(KEY)),
        );
        router(Arc::new(service))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn request(method: &str, uri: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(k) = key {
            builder = builder.header(API_KEY_HEADER, k);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn book(app: &Router, name: &str, symptoms: &[&str]) -> serde_json::Value {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/cases",
                serde_json::json!({ "subject_name": name, "symptoms": symptoms }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await
    }

    #[tokio::test]
    async fn health_is_open() {
        let response = test_app()
            .oneshot(request("GET", "/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await["ok"], true);
    }

    #[tokio::test]
    async fn booking_returns_assessment() {
        let app = test_app();
        let body = book(
            &app,
            "A. Rao",
            &["itching", "skin_rash", "nodal_skin_eruptions"],
        )
        .await;

        assert_eq!(body["id"], 1);
        assert_eq!(body["subject_name"], "A. Rao");
        assert_eq!(body["severity_score"], 8.0);
        assert_eq!(body["risk_level"], "Low");
        assert_eq!(body["priority"], 3);
    }

    #[tokio::test]
    async fn booking_without_symptoms_is_bad_request() {
        let response = test_app()
            .oneshot(json_request(
                "POST",
                "/cases",
                serde_json::json!({ "patient_name": "A. Rao", "symptoms": [] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("symptom"));
    }

    #[tokio::test]
    async fn malformed_booking_body_is_bad_request() {
        let wrong_type = json_request(
            "POST",
            "/cases",
            serde_json::json!({ "subject_name": "A. Rao", "symptoms": "itching" }),
        );
        let no_content_type = Request::builder()
            .method("POST")
            .uri("/cases")
            .body(Body::from(
                r#"{"subject_name": "A. Rao", "symptoms": ["itching"]}"#,
            ))
            .unwrap();
        let broken_json = Request::builder()
            .method("POST")
            .uri("/cases")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let app = test_app();
        for request in [wrong_type, no_content_type, broken_json] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = response_json(response).await;
            assert!(body["error"].is_string(), "unexpected body {body}");
        }
    }

    #[tokio::test]
    async fn queue_requires_api_key() {
        let app = test_app();
        book(&app, "A", &["itching"]).await;

        for key in [None, Some("wrong")] {
            let response = app
                .clone()
                .oneshot(request("GET", "/queue", key))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = response_json(response).await;
            assert!(body.get("cases").is_none(), "no case data on refusal");
        }
    }

    #[tokio::test]
    async fn queue_is_ordered_for_doctor() {
        let app = test_app();
        book(&app, "low", &["itching"]).await;
        book(&app, "high", &["chest_pain", "high_fever", "breathlessness"]).await;
        book(&app, "medium", &["chest_pain", "skin_rash"]).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/queue", Some(KEY)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        let names: Vec<&str> = body["cases"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["subject_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["high", "medium", "low"]);
    }

    #[tokio::test]
    async fn bearer_token_is_accepted() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/queue")
                    .header("Authorization", format!("Bearer {KEY}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn remove_is_idempotent_and_guarded() {
        let app = test_app();
        let booked = book(&app, "A", &["itching"]).await;
        let uri = format!("/cases/{}", booked["id"]);

        let refused = app
            .clone()
            .oneshot(request("DELETE", &uri, None))
            .await
            .unwrap();
        assert_eq!(refused.status(), StatusCode::UNAUTHORIZED);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(request("DELETE", &uri, Some(KEY)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let queue = app
            .clone()
            .oneshot(request("GET", "/queue", Some(KEY)))
            .await
            .unwrap();
        let body = response_json(queue).await;
        assert!(body["cases"].as_array().unwrap().is_empty());
    }

    #[test]
    fn api_key_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, "from-header".parse().unwrap());
        headers.insert("authorization", "Bearer from-bearer".parse().unwrap());
        assert_eq!(access_context(&headers).token(), Some("from-header"));

        assert_eq!(
            access_context(&HeaderMap::new()),
            AccessContext::anonymous()
        );
    }
}
