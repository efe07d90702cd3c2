use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub age: i64,
    pub gender: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPatientRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum PatientError {
    #[error("Full name and email are required.")]
    MissingField,
    #[error("Age must be a positive integer.")]
    InvalidAge,
    #[error("Patient ID is required.")]
    MissingId,
    #[error("At least one field (phone or address) must be provided.")]
    EmptyUpdate,
    #[error("Patient ID {0} not found.")]
    NotFound(i64),
    #[error("Store error: {0}")]
    Store(String),
}
