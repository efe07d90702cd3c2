use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub record_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_id: i64,
    pub diagnosis: String,
    pub prescription: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMedicalRecordRequest {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub appointment_id: Option<i64>,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub prescription: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMedicalRecordRequest {
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum MedicalRecordError {
    #[error("All fields (patient_id, doctor_id, appointment_id, diagnosis, prescription) are required.")]
    MissingField,
    #[error("Record ID is required.")]
    MissingId,
    #[error("At least one field (diagnosis or prescription) must be provided to update.")]
    EmptyUpdate,
    #[error("Record ID {0} not found.")]
    NotFound(i64),
    #[error("Store error: {0}")]
    Store(String),
}
