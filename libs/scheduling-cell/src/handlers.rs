// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    AddAvailabilityRequest, BookAppointmentRequest, ScheduleError, UpdateAppointmentStatusRequest,
    UpdateAvailabilityRequest,
};
use crate::services::{AvailabilityService, SchedulingService};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQueryParams {
    pub doctor_id: Option<i64>,
}

fn map_schedule_error(e: ScheduleError) -> AppError {
    match e {
        ScheduleError::MissingField(_)
        | ScheduleError::MissingId(_)
        | ScheduleError::InvalidFormat(_)
        | ScheduleError::InvalidStatus
        | ScheduleError::InvalidSlot(_)
        | ScheduleError::EmptyUpdate => AppError::BadRequest(e.to_string()),
        ScheduleError::NoAvailableSlot { .. } => AppError::Conflict(e.to_string()),
        ScheduleError::AppointmentNotFound(_) | ScheduleError::SlotNotFound(_) => {
            AppError::NotFound(e.to_string())
        }
        ScheduleError::Store(_) => AppError::Database(e.to_string()),
    }
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let scheduling_service = SchedulingService::new(&state);

    let appointment = scheduling_service
        .book_appointment(request, token)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked successfully."
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let scheduling_service = SchedulingService::new(&state);

    let appointments = scheduling_service
        .list_appointments(token)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdateAppointmentStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let scheduling_service = SchedulingService::new(&state);

    let appointment = scheduling_service
        .update_appointment_status(Some(appointment_id), request.status.as_deref(), token)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment status updated successfully."
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let scheduling_service = SchedulingService::new(&state);

    scheduling_service
        .cancel_appointment(Some(appointment_id), token)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled successfully."
    })))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn add_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<AddAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let availability_service = AvailabilityService::new(&state);

    let slot = availability_service
        .add_availability(request, token)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "availability": slot,
        "message": "Availability added successfully."
    })))
}

#[axum::debug_handler]
pub async fn list_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(params): Query<AvailabilityQueryParams>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let availability_service = AvailabilityService::new(&state);

    let slots = availability_service
        .list_availability(params.doctor_id, token)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "availability": slots,
        "total": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(availability_id): Path<i64>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let availability_service = AvailabilityService::new(&state);

    let slot = availability_service
        .update_availability(Some(availability_id), request, token)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "availability": slot,
        "message": "Availability updated successfully."
    })))
}

#[axum::debug_handler]
pub async fn cancel_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(availability_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let availability_service = AvailabilityService::new(&state);

    availability_service
        .cancel_availability(Some(availability_id), token)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Availability cancelled successfully."
    })))
}
