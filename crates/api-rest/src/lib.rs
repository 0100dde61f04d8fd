//! # API REST
//!
//! HTTP surface of the MedChain submission gateway.
//!
//! Handles:
//! - the page carrying the hospital, patient and medical-record forms
//! - one submit endpoint per form, taking the form-urlencoded body the page posts
//! - OpenAPI/Swagger documentation and CORS
//!
//! Every submit endpoint answers with a JSON [`Notice`]; the status code mirrors the
//! notice's failure category so non-browser callers can branch without parsing it.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Form, Router,
};
use medchain_core::{FailureCategory, FormFields, FormKind, Notice, Outcome, SubmissionGateway};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

const FORMS_PAGE: &str = include_str!("../static/index.html");

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<SubmissionGateway>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, submit_hospital, submit_patient, submit_medical_record),
    components(schemas(HealthRes, Notice, Outcome, FailureCategory, FormKind))
)]
struct ApiDoc;

/// Build the REST router around `gateway`.
pub fn router(gateway: Arc<SubmissionGateway>) -> Router {
    Router::new()
        .route("/", get(forms_page))
        .route("/health", get(health))
        .route("/hospitals", post(submit_hospital))
        .route("/patients", post(submit_patient))
        .route("/medical-records", post(submit_medical_record))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { gateway })
}

/// HTTP status for a notice.
pub fn status_for(notice: &Notice) -> StatusCode {
    match notice.category {
        None => StatusCode::OK,
        Some(FailureCategory::InvalidInput) => StatusCode::BAD_REQUEST,
        Some(FailureCategory::Unauthenticated) => StatusCode::UNAUTHORIZED,
        Some(FailureCategory::InFlight) => StatusCode::CONFLICT,
        Some(FailureCategory::Rejected) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(FailureCategory::Transport) => StatusCode::BAD_GATEWAY,
        Some(FailureCategory::Timeout) => StatusCode::GATEWAY_TIMEOUT,
    }
}

async fn submit(
    state: &AppState,
    form: FormKind,
    body: Result<Form<FormFields>, FormRejection>,
) -> (StatusCode, Json<Notice>) {
    let notice = match body {
        Ok(Form(fields)) => state.gateway.submit_form(form, &fields).await,
        Err(rejection) => {
            tracing::warn!(form = %form, "unreadable form body: {}", rejection.body_text());
            unreadable_body(form, &rejection)
        }
    };
    tracing::info!(form = %form, outcome = ?notice.outcome, "-- submission answered");
    (status_for(&notice), Json(notice))
}

fn unreadable_body(form: FormKind, rejection: &FormRejection) -> Notice {
    Notice {
        outcome: Outcome::Failure,
        form,
        category: Some(FailureCategory::InvalidInput),
        message: format!("The form could not be read: {}", rejection.body_text()),
        transaction_hash: None,
    }
}

async fn forms_page() -> Html<&'static str> {
    Html(FORMS_PAGE)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports that the gateway process is up. It does not contact the chain node.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "MedChain gateway is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/hospitals",
    request_body(
        content = HashMap<String, String>,
        content_type = "application/x-www-form-urlencoded",
        description = "Fields hospital-id, hospital-name, hospital-address, hospital-spec"
    ),
    responses(
        (status = 200, description = "Hospital stored", body = Notice),
        (status = 400, description = "Incomplete form", body = Notice),
        (status = 401, description = "No authorised account", body = Notice),
        (status = 409, description = "Submission already in progress", body = Notice),
        (status = 422, description = "Rejected by the contract", body = Notice),
        (status = 502, description = "Node unreachable", body = Notice),
        (status = 504, description = "Not confirmed in time", body = Notice)
    )
)]
/// Submit the hospital form
///
/// Dispatches `storeHospitalDetails(id, name, address, specialization)`.
#[axum::debug_handler]
async fn submit_hospital(
    State(state): State<AppState>,
    body: Result<Form<FormFields>, FormRejection>,
) -> (StatusCode, Json<Notice>) {
    submit(&state, FormKind::Hospital, body).await
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body(
        content = HashMap<String, String>,
        content_type = "application/x-www-form-urlencoded",
        description = "Fields patient-id, patient-name, patient-age, patient-gender, patient-height, patient-weight, patient-address, patient-phone, patient-email, patient-date"
    ),
    responses(
        (status = 200, description = "Patient stored", body = Notice),
        (status = 400, description = "Incomplete or malformed form", body = Notice),
        (status = 401, description = "No authorised account", body = Notice),
        (status = 409, description = "Submission already in progress", body = Notice),
        (status = 422, description = "Rejected by the contract", body = Notice),
        (status = 502, description = "Node unreachable", body = Notice),
        (status = 504, description = "Not confirmed in time", body = Notice)
    )
)]
/// Submit the patient form
///
/// Dispatches `storePatientDetails(id, name, age, gender, height, weight, address, phone,
/// email, admissionDate)`.
#[axum::debug_handler]
async fn submit_patient(
    State(state): State<AppState>,
    body: Result<Form<FormFields>, FormRejection>,
) -> (StatusCode, Json<Notice>) {
    submit(&state, FormKind::Patient, body).await
}

#[utoipa::path(
    post,
    path = "/medical-records",
    request_body(
        content = HashMap<String, String>,
        content_type = "application/x-www-form-urlencoded",
        description = "Field record-id (the patient id)"
    ),
    responses(
        (status = 200, description = "Medical record created", body = Notice),
        (status = 400, description = "Incomplete form", body = Notice),
        (status = 401, description = "No authorised account", body = Notice),
        (status = 409, description = "Submission already in progress", body = Notice),
        (status = 422, description = "Rejected by the contract", body = Notice),
        (status = 502, description = "Node unreachable", body = Notice),
        (status = 504, description = "Not confirmed in time", body = Notice)
    )
)]
/// Submit the medical record form
///
/// Dispatches `createMedicalRecord(patientId)`.
#[axum::debug_handler]
async fn submit_medical_record(
    State(state): State<AppState>,
    body: Result<Form<FormFields>, FormRejection>,
) -> (StatusCode, Json<Notice>) {
    submit(&state, FormKind::MedicalRecord, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use medchain_core::testing::RecordingClient;
    use medchain_core::{Address, CallArg, ContractAddresses, GatewayConfig, RemoteOperation};
    use serde_json::Value;
    use tower::ServiceExt;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn app(client: Arc<RecordingClient>) -> Router {
        let cfg = GatewayConfig::new(
            "http://localhost:7545",
            ContractAddresses {
                hospital: addr(0x11),
                patient: addr(0x22),
                records: addr(0x33),
            },
        )
        .unwrap();
        router(Arc::new(SubmissionGateway::new(Arc::new(cfg), client)))
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn hospital_form_is_dispatched_once() {
        let client = Arc::new(RecordingClient::new(vec![addr(0xaa)]));
        let response = app(client.clone())
            .oneshot(form_post(
                "/hospitals",
                "hospital-id=H1&hospital-name=General&hospital-address=123+Main+St&hospital-spec=Cardiology",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["outcome"], "success");
        assert_eq!(body["message"], "Hospital added successfully!");

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].operation, RemoteOperation::StoreHospitalDetails);
        assert_eq!(calls[0].args[2], CallArg::Text("123 Main St".into()));
    }

    #[tokio::test]
    async fn patient_form_with_bad_age_is_a_bad_request() {
        let client = Arc::new(RecordingClient::new(vec![addr(0xaa)]));
        let body = "patient-id=P1&patient-name=Ada&patient-age=old&patient-gender=F\
                    &patient-height=165&patient-weight=58&patient-address=Here\
                    &patient-phone=555&patient-email=a%40b.c&patient-date=2024-03-01";
        let response = app(client.clone())
            .oneshot(form_post("/patients", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["category"], "invalid_input");
        assert!(body["message"].as_str().unwrap().contains("patient-age"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn contract_rejection_is_unprocessable() {
        let client = Arc::new(RecordingClient::new(vec![addr(0xaa)]).rejecting("patient not found"));
        let response = app(client)
            .oneshot(form_post("/medical-records", "record-id=P1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["outcome"], "failure");
        assert!(body["message"].as_str().unwrap().contains("patient not found"));
    }

    #[tokio::test]
    async fn missing_account_is_unauthorized() {
        let client = Arc::new(RecordingClient::new(vec![]));
        let response = app(client.clone())
            .oneshot(form_post("/medical-records", "record-id=P1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn serves_forms_page_and_health() {
        let client = Arc::new(RecordingClient::new(vec![]));
        let router = app(client);

        let page = router
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        let html = page.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains("id=\"hospital-form\""));
        assert!(html.contains("name=\"patient-date\""));

        let health = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(json_body(health).await["ok"], true);
    }

    #[tokio::test]
    async fn unreadable_body_still_answers_with_a_notice() {
        let client = Arc::new(RecordingClient::new(vec![addr(0xaa)]));
        let request = Request::builder()
            .method("POST")
            .uri("/hospitals")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("hospital-id=H1"))
            .unwrap();

        let response = app(client.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["outcome"], "failure");
        assert_eq!(body["category"], "invalid_input");
        assert_eq!(body["form"], "hospital");
        assert!(client.calls().is_empty());
    }

    #[test]
    fn status_codes_follow_categories() {
        let notice = |category| Notice {
            outcome: Outcome::Failure,
            form: FormKind::Hospital,
            category: Some(category),
            message: String::new(),
            transaction_hash: None,
        };
        assert_eq!(status_for(&notice(FailureCategory::InFlight)), StatusCode::CONFLICT);
        assert_eq!(status_for(&notice(FailureCategory::Timeout)), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(status_for(&notice(FailureCategory::Transport)), StatusCode::BAD_GATEWAY);
    }
}
