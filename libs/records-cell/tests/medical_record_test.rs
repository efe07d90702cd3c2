use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use records_cell::models::{
    AddMedicalRecordRequest, MedicalRecordError, UpdateMedicalRecordRequest,
};
use records_cell::router::medical_record_routes;
use records_cell::services::MedicalRecordService;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockStoreRows, TestUser};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: server.uri(),
        supabase_key: "test-service-key".to_string(),
        jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn add_request(diagnosis: &str, prescription: &str) -> AddMedicalRecordRequest {
    AddMedicalRecordRequest {
        patient_id: Some(3),
        doctor_id: Some(7),
        appointment_id: Some(42),
        diagnosis: diagnosis.to_string(),
        prescription: prescription.to_string(),
    }
}

#[tokio::test]
async fn adding_a_record_round_trips() {
    let mock_server = MockServer::start().await;
    let service = MedicalRecordService::new(&config_for(&mock_server));

    Mock::given(method("POST"))
        .and(path("/rest/v1/medical_records"))
        .and(body_partial_json(json!({
            "patient_id": 3,
            "doctor_id": 7,
            "appointment_id": 42,
            "diagnosis": "Seasonal rhinitis"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::medical_record(1, 3, 7, 42)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = service
        .add_medical_record(
            add_request("Seasonal rhinitis", "Loratadine 10mg once daily"),
            "token",
        )
        .await
        .unwrap();

    assert_eq!(record.record_id, 1);
    assert_eq!(record.diagnosis, "Seasonal rhinitis");
}

#[tokio::test]
async fn add_requires_every_field() {
    let mock_server = MockServer::start().await;
    let service = MedicalRecordService::new(&config_for(&mock_server));

    let err = service
        .add_medical_record(add_request("", "Loratadine 10mg once daily"), "token")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "All fields (patient_id, doctor_id, appointment_id, diagnosis, prescription) are required."
    );

    let err = service
        .add_medical_record(
            AddMedicalRecordRequest {
                patient_id: Some(3),
                doctor_id: None,
                appointment_id: Some(42),
                diagnosis: "Seasonal rhinitis".to_string(),
                prescription: "Loratadine 10mg once daily".to_string(),
            },
            "token",
        )
        .await
        .unwrap_err();
    assert_matches!(err, MedicalRecordError::MissingField);
}

#[tokio::test]
async fn update_requires_diagnosis_or_prescription() {
    let mock_server = MockServer::start().await;
    let service = MedicalRecordService::new(&config_for(&mock_server));

    let err = service
        .update_medical_record(
            Some(1),
            UpdateMedicalRecordRequest { diagnosis: None, prescription: None },
            "token",
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "At least one field (diagnosis or prescription) must be provided to update."
    );
}

#[tokio::test]
async fn updating_an_unknown_record_is_not_found() {
    let mock_server = MockServer::start().await;
    let service = MedicalRecordService::new(&config_for(&mock_server));

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/medical_records"))
        .and(query_param("record_id", "eq.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let err = service
        .update_medical_record(
            Some(99),
            UpdateMedicalRecordRequest {
                diagnosis: Some("Updated diagnosis".to_string()),
                prescription: None,
            },
            "token",
        )
        .await
        .unwrap_err();

    assert_matches!(err, MedicalRecordError::NotFound(99));
    assert_eq!(err.to_string(), "Record ID 99 not found.");
}

#[tokio::test]
async fn records_can_be_listed_through_the_api() {
    let mock_server = MockServer::start().await;
    let config = config_for(&mock_server);
    let app = medical_record_routes(Arc::new(config.clone()));

    let user = TestUser::receptionist("frontdesk");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::medical_record(1, 3, 7, 42)
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["total"], 1);
    assert_eq!(json_response["records"][0]["record_id"], 1);
}

#[tokio::test]
async fn record_routes_require_a_token() {
    let mock_server = MockServer::start().await;
    let app = medical_record_routes(Arc::new(config_for(&mock_server)));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
