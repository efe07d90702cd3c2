use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AddDoctorRequest, DoctorError, UpdateDoctorRequest};
use crate::services::DoctorService;

fn map_doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::MissingField
        | DoctorError::InvalidExperience
        | DoctorError::MissingId
        | DoctorError::EmptyUpdate => AppError::BadRequest(e.to_string()),
        DoctorError::NotFound(_) => AppError::NotFound(e.to_string()),
        DoctorError::Store(_) => AppError::Database(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<AddDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service
        .add_doctor(request, token)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Doctor added successfully."
    })))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service
        .list_doctors(token)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service
        .update_doctor(Some(doctor_id), request, token)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Doctor updated successfully."
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let doctor_service = DoctorService::new(&state);

    doctor_service
        .delete_doctor(Some(doctor_id), token)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor deleted successfully."
    })))
}
