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

use crate::models::{AddPatientRequest, PatientError, UpdatePatientRequest};
use crate::services::PatientService;

fn map_patient_error(e: PatientError) -> AppError {
    match e {
        PatientError::MissingField
        | PatientError::InvalidAge
        | PatientError::MissingId
        | PatientError::EmptyUpdate => AppError::BadRequest(e.to_string()),
        PatientError::NotFound(_) => AppError::NotFound(e.to_string()),
        PatientError::Store(_) => AppError::Database(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn add_patient(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<AddPatientRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let patient_service = PatientService::new(&state);

    let patient = patient_service
        .add_patient(request, token)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({
        "success": true,
        "patient": patient,
        "message": "Patient added successfully."
    })))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let patient_service = PatientService::new(&state);

    let patients = patient_service
        .list_patients(token)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(patient_id): Path<i64>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let patient_service = PatientService::new(&state);

    let patient = patient_service
        .update_patient(Some(patient_id), request, token)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({
        "success": true,
        "patient": patient,
        "message": "Patient updated successfully."
    })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let patient_service = PatientService::new(&state);

    patient_service
        .delete_patient(Some(patient_id), token)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient deleted successfully."
    })))
}
