use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AddPaymentRequest, Payment, PaymentError, PaymentStatus, UpdatePaymentRequest};

const TABLE_PATH: &str = "/rest/v1/payments";

pub struct PaymentService {
    supabase: SupabaseClient,
}

impl PaymentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Record a charge for an appointment. New payments start `Pending`;
    /// the processor callback flips them later.
    pub async fn add_payment(
        &self,
        request: AddPaymentRequest,
        auth_token: &str,
    ) -> Result<Payment, PaymentError> {
        let appointment_id = request.appointment_id.ok_or(PaymentError::MissingField)?;
        let patient_id = request.patient_id.ok_or(PaymentError::MissingField)?;
        let amount = request.amount.ok_or(PaymentError::MissingField)?;
        if amount <= 0.0 {
            return Err(PaymentError::InvalidAmount);
        }

        debug!("Adding payment of {} for appointment {}", amount, appointment_id);

        let payment_data = json!({
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "amount": amount,
            "transaction_id": request.transaction_id,
            "payment_status": PaymentStatus::Pending.as_str()
        });

        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            TABLE_PATH,
            Some(auth_token),
            Some(payment_data),
            Some(return_representation()),
        ).await.map_err(|e| PaymentError::Store(e.to_string()))?;

        let row = rows.first()
            .ok_or_else(|| PaymentError::Store("Payment insert returned no rows".to_string()))?;
        serde_json::from_value(row.clone())
            .map_err(|e| PaymentError::Store(e.to_string()))
    }

    pub async fn list_payments(&self, auth_token: &str) -> Result<Vec<Payment>, PaymentError> {
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            TABLE_PATH,
            Some(auth_token),
            None,
        ).await.map_err(|e| PaymentError::Store(e.to_string()))?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| PaymentError::Store(e.to_string())))
            .collect()
    }

    /// Move a payment to a new status. With no status supplied the
    /// current row is returned unchanged.
    pub async fn update_payment(
        &self,
        payment_id: Option<i64>,
        request: UpdatePaymentRequest,
        auth_token: &str,
    ) -> Result<Payment, PaymentError> {
        let payment_id = payment_id.ok_or(PaymentError::MissingId)?;

        let status = match request.payment_status.as_deref() {
            Some(raw) => Some(PaymentStatus::parse(raw).ok_or(PaymentError::InvalidStatus)?),
            None => None,
        };

        let path = format!("{}?payment_id=eq.{}", TABLE_PATH, payment_id);

        let rows: Vec<Value> = match status {
            Some(status) => {
                info!("Updating payment {} to status {}", payment_id, status);
                self.supabase.request_with_headers(
                    Method::PATCH,
                    &path,
                    Some(auth_token),
                    Some(json!({ "payment_status": status.as_str() })),
                    Some(return_representation()),
                ).await.map_err(|e| PaymentError::Store(e.to_string()))?
            }
            None => self.supabase.request(
                Method::GET,
                &path,
                Some(auth_token),
                None,
            ).await.map_err(|e| PaymentError::Store(e.to_string()))?,
        };

        let row = rows.first().ok_or(PaymentError::NotFound(payment_id))?;
        serde_json::from_value(row.clone())
            .map_err(|e| PaymentError::Store(e.to_string()))
    }

    /// Removal is idempotent; deleting an absent payment is not an error.
    pub async fn delete_payment(
        &self,
        payment_id: Option<i64>,
        auth_token: &str,
    ) -> Result<(), PaymentError> {
        let payment_id = payment_id.ok_or(PaymentError::MissingId)?;

        info!("Deleting payment {}", payment_id);

        let path = format!("{}?payment_id=eq.{}", TABLE_PATH, payment_id);
        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
            Some(return_representation()),
        ).await.map_err(|e| PaymentError::Store(e.to_string()))?;

        Ok(())
    }
}

fn return_representation() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));
    headers
}
