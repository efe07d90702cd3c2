use assert_matches::assert_matches;
use chrono::NaiveTime;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scheduling_cell::models::{AddAvailabilityRequest, ScheduleError, UpdateAvailabilityRequest};
use scheduling_cell::services::AvailabilityService;
use shared_config::AppConfig;
use shared_utils::test_utils::MockStoreRows;

fn service_for(server: &MockServer) -> AvailabilityService {
    AvailabilityService::new(&AppConfig {
        supabase_url: server.uri(),
        supabase_key: "test-service-key".to_string(),
        jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    })
}

fn add_request(doctor_id: i64, date: &str, start: &str, end: &str) -> AddAvailabilityRequest {
    AddAvailabilityRequest {
        doctor_id: Some(doctor_id),
        available_date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn empty_update() -> UpdateAvailabilityRequest {
    UpdateAvailabilityRequest {
        is_available: None,
        start_time: None,
        end_time: None,
        available_date: None,
    }
}

#[tokio::test]
async fn new_windows_are_inserted_open() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_availability"))
        .and(body_partial_json(json!({
            "doctor_id": 7,
            "available_date": "2025-03-10",
            "start_time": "09:00",
            "end_time": "17:00",
            "is_available": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::slot(5, 7, "2025-03-10", "09:00", "17:00", true)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let slot = service
        .add_availability(add_request(7, "2025-03-10", "09:00", "17:00"), "service-token")
        .await
        .unwrap();

    assert_eq!(slot.availability_id, 5);
    assert!(slot.is_available);
}

#[tokio::test]
async fn add_requires_every_field() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    let err = service
        .add_availability(
            AddAvailabilityRequest {
                doctor_id: None,
                available_date: "2025-03-10".to_string(),
                start_time: "09:00".to_string(),
                end_time: "17:00".to_string(),
            },
            "service-token",
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "All fields (doctor_id, available_date, start_time, end_time) are required."
    );

    let err = service
        .add_availability(add_request(7, "2025-03-10", "", "17:00"), "service-token")
        .await
        .unwrap_err();
    assert_matches!(err, ScheduleError::MissingField(_));
}

#[tokio::test]
async fn add_rejects_bad_times_with_field_specific_messages() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    let err = service
        .add_availability(add_request(7, "2025-03-10", "9am", "17:00"), "service-token")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid start time '9am'. Use HH:MM.");

    let err = service
        .add_availability(add_request(7, "2025-03-10", "09:00", "late"), "service-token")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid end time 'late'. Use HH:MM.");

    let err = service
        .add_availability(add_request(7, "tomorrow", "09:00", "17:00"), "service-token")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid date format. Use YYYY-MM-DD.");
}

#[tokio::test]
async fn listing_filters_by_doctor() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .and(query_param("doctor_id", "eq.7"))
        .and(query_param("order", "available_date.asc,start_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::slot(5, 7, "2025-03-10", "09:00", "12:00", true),
            MockStoreRows::slot(6, 7, "2025-03-10", "13:00", "17:00", false)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let slots = service.list_availability(Some(7), "service-token").await.unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert!(!slots[1].is_available);
}

#[tokio::test]
async fn update_normalizes_times_before_patching() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctor_availability"))
        .and(query_param("availability_id", "eq.5"))
        .and(body_partial_json(json!({ "start_time": "10:00" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::slot(5, 7, "2025-03-10", "10:00", "17:00", true)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let slot = service
        .update_availability(
            Some(5),
            UpdateAvailabilityRequest {
                start_time: Some("10:00:00".to_string()),
                ..empty_update()
            },
            "service-token",
        )
        .await
        .unwrap();

    assert_eq!(slot.start_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
}

#[tokio::test]
async fn update_rejects_inverted_windows() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    let err = service
        .update_availability(
            Some(5),
            UpdateAvailabilityRequest {
                start_time: Some("15:00".to_string()),
                end_time: Some("09:00".to_string()),
                ..empty_update()
            },
            "service-token",
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Start time must be before end time.");
}

#[tokio::test]
async fn update_with_no_fields_is_an_error() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    let err = service
        .update_availability(Some(5), empty_update(), "service-token")
        .await
        .unwrap_err();

    assert_matches!(err, ScheduleError::EmptyUpdate);
    assert_eq!(
        err.to_string(),
        "At least one field (is_available, start_time, end_time, available_date) must be provided."
    );
}

#[tokio::test]
async fn updating_an_unknown_window_is_not_found() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctor_availability"))
        .and(query_param("availability_id", "eq.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let err = service
        .update_availability(
            Some(99),
            UpdateAvailabilityRequest {
                is_available: Some(false),
                ..empty_update()
            },
            "service-token",
        )
        .await
        .unwrap_err();

    assert_matches!(err, ScheduleError::SlotNotFound(99));
    assert_eq!(err.to_string(), "Availability ID 99 not found.");
}

#[tokio::test]
async fn cancelling_removes_the_window() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/doctor_availability"))
        .and(query_param("availability_id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::slot(5, 7, "2025-03-10", "09:00", "17:00", true)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    service.cancel_availability(Some(5), "service-token").await.unwrap();
}

#[tokio::test]
async fn cancelling_without_an_id_is_rejected() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    let err = service.cancel_availability(None, "service-token").await.unwrap_err();

    assert_eq!(err.to_string(), "Availability ID is required.");
}
