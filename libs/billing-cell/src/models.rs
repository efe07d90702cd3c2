use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: i64,
    pub appointment_id: i64,
    pub patient_id: i64,
    pub amount: f64,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Exact-name parse; no case folding.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Pending" => Some(Self::Pending),
            "Completed" => Some(Self::Completed),
            "Failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPaymentRequest {
    pub appointment_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub amount: Option<f64>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaymentRequest {
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum PaymentError {
    #[error("appointment_id, patient_id, and amount are required.")]
    MissingField,
    #[error("Amount must be a positive number.")]
    InvalidAmount,
    #[error("Payment ID is required.")]
    MissingId,
    #[error("Status must be 'Pending', 'Completed', or 'Failed'.")]
    InvalidStatus,
    #[error("Payment ID {0} not found.")]
    NotFound(i64),
    #[error("Store error: {0}")]
    Store(String),
}
