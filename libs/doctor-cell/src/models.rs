use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: i64,
    pub full_name: String,
    pub specialization: String,
    pub email: String,
    pub phone: String,
    pub experience_years: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDoctorRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub experience_years: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub phone: Option<String>,
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum DoctorError {
    #[error("Full name and email are required.")]
    MissingField,
    #[error("Experience years must be a positive integer.")]
    InvalidExperience,
    #[error("Doctor ID is required.")]
    MissingId,
    #[error("At least one field (phone or specialization) must be provided.")]
    EmptyUpdate,
    #[error("Doctor ID {0} not found.")]
    NotFound(i64),
    #[error("Store error: {0}")]
    Store(String),
}
