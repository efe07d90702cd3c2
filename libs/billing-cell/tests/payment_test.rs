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

use billing_cell::models::{AddPaymentRequest, PaymentError, PaymentStatus, UpdatePaymentRequest};
use billing_cell::router::payment_routes;
use billing_cell::services::PaymentService;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockStoreRows, TestUser};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: server.uri(),
        supabase_key: "test-service-key".to_string(),
        jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn add_request(appointment_id: Option<i64>, patient_id: Option<i64>, amount: Option<f64>) -> AddPaymentRequest {
    AddPaymentRequest {
        appointment_id,
        patient_id,
        amount,
        transaction_id: None,
    }
}

#[tokio::test]
async fn new_payments_start_pending() {
    let mock_server = MockServer::start().await;
    let service = PaymentService::new(&config_for(&mock_server));

    Mock::given(method("POST"))
        .and(path("/rest/v1/payments"))
        .and(body_partial_json(json!({
            "appointment_id": 42,
            "patient_id": 3,
            "amount": 80.0,
            "payment_status": "Pending"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::payment(1, 42, 3, 80.0)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let payment = service
        .add_payment(add_request(Some(42), Some(3), Some(80.0)), "token")
        .await
        .unwrap();

    assert_eq!(payment.payment_id, 1);
    assert_eq!(payment.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn add_validates_fields_and_amount() {
    let mock_server = MockServer::start().await;
    let service = PaymentService::new(&config_for(&mock_server));

    let err = service
        .add_payment(add_request(None, Some(3), Some(80.0)), "token")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "appointment_id, patient_id, and amount are required.");

    let err = service
        .add_payment(add_request(Some(42), Some(3), Some(0.0)), "token")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Amount must be a positive number.");

    let err = service
        .add_payment(add_request(Some(42), Some(3), Some(-12.5)), "token")
        .await
        .unwrap_err();
    assert_matches!(err, PaymentError::InvalidAmount);
}

#[tokio::test]
async fn update_rejects_unknown_statuses() {
    let mock_server = MockServer::start().await;
    let service = PaymentService::new(&config_for(&mock_server));

    let err = service
        .update_payment(
            Some(1),
            UpdatePaymentRequest { payment_status: Some("Paid".to_string()) },
            "token",
        )
        .await
        .unwrap_err();

    assert_matches!(err, PaymentError::InvalidStatus);
    assert_eq!(err.to_string(), "Status must be 'Pending', 'Completed', or 'Failed'.");
}

#[tokio::test]
async fn update_persists_a_valid_status() {
    let mock_server = MockServer::start().await;
    let service = PaymentService::new(&config_for(&mock_server));

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/payments"))
        .and(query_param("payment_id", "eq.1"))
        .and(body_partial_json(json!({ "payment_status": "Completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "payment_id": 1,
            "appointment_id": 42,
            "patient_id": 3,
            "amount": 80.0,
            "payment_status": "Completed",
            "transaction_id": "txn-991"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let payment = service
        .update_payment(
            Some(1),
            UpdatePaymentRequest { payment_status: Some("Completed".to_string()) },
            "token",
        )
        .await
        .unwrap();

    assert_eq!(payment.payment_status, PaymentStatus::Completed);
}

#[tokio::test]
async fn update_without_a_status_returns_the_current_row() {
    let mock_server = MockServer::start().await;
    let service = PaymentService::new(&config_for(&mock_server));

    Mock::given(method("GET"))
        .and(path("/rest/v1/payments"))
        .and(query_param("payment_id", "eq.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::payment(1, 42, 3, 80.0)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let payment = service
        .update_payment(Some(1), UpdatePaymentRequest { payment_status: None }, "token")
        .await
        .unwrap();

    assert_eq!(payment.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn payments_can_be_added_through_the_api() {
    let mock_server = MockServer::start().await;
    let config = config_for(&mock_server);
    let app = payment_routes(Arc::new(config.clone()));

    let user = TestUser::receptionist("frontdesk");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(24));

    Mock::given(method("POST"))
        .and(path("/rest/v1/payments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::payment(1, 42, 3, 80.0)
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "appointment_id": 42, "patient_id": 3, "amount": 80.0 }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["success"], true);
    assert_eq!(json_response["payment"]["payment_status"], "Pending");
}

#[tokio::test]
async fn invalid_amounts_are_bad_requests_at_the_edge() {
    let mock_server = MockServer::start().await;
    let config = config_for(&mock_server);
    let app = payment_routes(Arc::new(config.clone()));

    let user = TestUser::receptionist("frontdesk");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(24));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "appointment_id": 42, "patient_id": 3, "amount": -5.0 }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["error"], "Amount must be a positive number.");
}
