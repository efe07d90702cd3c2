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

use crate::models::{AddMedicalRecordRequest, MedicalRecordError, UpdateMedicalRecordRequest};
use crate::services::MedicalRecordService;

fn map_record_error(e: MedicalRecordError) -> AppError {
    match e {
        MedicalRecordError::MissingField
        | MedicalRecordError::MissingId
        | MedicalRecordError::EmptyUpdate => AppError::BadRequest(e.to_string()),
        MedicalRecordError::NotFound(_) => AppError::NotFound(e.to_string()),
        MedicalRecordError::Store(_) => AppError::Database(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn add_medical_record(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<AddMedicalRecordRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let record_service = MedicalRecordService::new(&state);

    let record = record_service
        .add_medical_record(request, token)
        .await
        .map_err(map_record_error)?;

    Ok(Json(json!({
        "success": true,
        "record": record,
        "message": "Medical record added successfully."
    })))
}

#[axum::debug_handler]
pub async fn list_medical_records(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let record_service = MedicalRecordService::new(&state);

    let records = record_service
        .list_medical_records(token)
        .await
        .map_err(map_record_error)?;

    Ok(Json(json!({
        "records": records,
        "total": records.len()
    })))
}

#[axum::debug_handler]
pub async fn update_medical_record(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(record_id): Path<i64>,
    Json(request): Json<UpdateMedicalRecordRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let record_service = MedicalRecordService::new(&state);

    let record = record_service
        .update_medical_record(Some(record_id), request, token)
        .await
        .map_err(map_record_error)?;

    Ok(Json(json!({
        "success": true,
        "record": record,
        "message": "Medical record updated successfully."
    })))
}

#[axum::debug_handler]
pub async fn delete_medical_record(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(record_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let record_service = MedicalRecordService::new(&state);

    record_service
        .delete_medical_record(Some(record_id), token)
        .await
        .map_err(map_record_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Medical record deleted successfully."
    })))
}
