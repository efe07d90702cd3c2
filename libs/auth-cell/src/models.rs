use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Staff account row. The hash never leaves the service: it is read
/// from the store but skipped on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum AuthError {
    #[error("Username, email, and password are required.")]
    MissingField,
    #[error("Username and password are required.")]
    MissingCredentials,
    #[error("Username '{0}' is already taken.")]
    UsernameTaken(String),
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("Credential error: {0}")]
    Credential(String),
    #[error("Store error: {0}")]
    Store(String),
}
