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

use crate::models::{AddPaymentRequest, PaymentError, UpdatePaymentRequest};
use crate::services::PaymentService;

fn map_payment_error(e: PaymentError) -> AppError {
    match e {
        PaymentError::MissingField
        | PaymentError::InvalidAmount
        | PaymentError::MissingId
        | PaymentError::InvalidStatus => AppError::BadRequest(e.to_string()),
        PaymentError::NotFound(_) => AppError::NotFound(e.to_string()),
        PaymentError::Store(_) => AppError::Database(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn add_payment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<AddPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let payment_service = PaymentService::new(&state);

    let payment = payment_service
        .add_payment(request, token)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({
        "success": true,
        "payment": payment,
        "message": "Payment added successfully."
    })))
}

#[axum::debug_handler]
pub async fn list_payments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let payment_service = PaymentService::new(&state);

    let payments = payment_service
        .list_payments(token)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({
        "payments": payments,
        "total": payments.len()
    })))
}

#[axum::debug_handler]
pub async fn update_payment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(payment_id): Path<i64>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let payment_service = PaymentService::new(&state);

    let payment = payment_service
        .update_payment(Some(payment_id), request, token)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({
        "success": true,
        "payment": payment,
        "message": "Payment updated successfully."
    })))
}

#[axum::debug_handler]
pub async fn delete_payment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(payment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let payment_service = PaymentService::new(&state);

    payment_service
        .delete_payment(Some(payment_id), token)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment deleted successfully."
    })))
}
