use anyhow::Result;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AddPatientRequest, Patient, PatientError, UpdatePatientRequest};

const TABLE_PATH: &str = "/rest/v1/patients";

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn add_patient(
        &self,
        request: AddPatientRequest,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        if request.full_name.trim().is_empty() || request.email.trim().is_empty() {
            return Err(PatientError::MissingField);
        }
        let age = match request.age {
            Some(age) if age >= 0 => age,
            _ => return Err(PatientError::InvalidAge),
        };

        debug!("Adding patient {}", request.full_name);

        let patient_data = json!({
            "full_name": request.full_name,
            "email": request.email,
            "phone": request.phone,
            "age": age,
            "gender": request.gender,
            "address": request.address
        });

        let rows = self.insert(patient_data, auth_token).await
            .map_err(|e| PatientError::Store(e.to_string()))?;

        let row = rows.first()
            .ok_or_else(|| PatientError::Store("Patient insert returned no rows".to_string()))?;
        serde_json::from_value(row.clone())
            .map_err(|e| PatientError::Store(e.to_string()))
    }

    pub async fn list_patients(&self, auth_token: &str) -> Result<Vec<Patient>, PatientError> {
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            TABLE_PATH,
            Some(auth_token),
            None,
        ).await.map_err(|e| PatientError::Store(e.to_string()))?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| PatientError::Store(e.to_string())))
            .collect()
    }

    pub async fn update_patient(
        &self,
        patient_id: Option<i64>,
        request: UpdatePatientRequest,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        let patient_id = patient_id.ok_or(PatientError::MissingId)?;

        let mut update_data = serde_json::Map::new();
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if update_data.is_empty() {
            return Err(PatientError::EmptyUpdate);
        }

        info!("Updating patient {}", patient_id);

        let path = format!("{}?patient_id=eq.{}", TABLE_PATH, patient_id);
        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(Value::Object(update_data)),
            Some(return_representation()),
        ).await.map_err(|e| PatientError::Store(e.to_string()))?;

        let row = rows.first().ok_or(PatientError::NotFound(patient_id))?;
        serde_json::from_value(row.clone())
            .map_err(|e| PatientError::Store(e.to_string()))
    }

    /// Removal is idempotent; deleting an absent patient is not an error.
    pub async fn delete_patient(
        &self,
        patient_id: Option<i64>,
        auth_token: &str,
    ) -> Result<(), PatientError> {
        let patient_id = patient_id.ok_or(PatientError::MissingId)?;

        info!("Deleting patient {}", patient_id);

        let path = format!("{}?patient_id=eq.{}", TABLE_PATH, patient_id);
        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
            Some(return_representation()),
        ).await.map_err(|e| PatientError::Store(e.to_string()))?;

        Ok(())
    }

    async fn insert(&self, patient_data: Value, auth_token: &str) -> Result<Vec<Value>> {
        self.supabase.request_with_headers(
            Method::POST,
            TABLE_PATH,
            Some(auth_token),
            Some(patient_data),
            Some(return_representation()),
        ).await
    }
}

fn return_representation() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));
    headers
}
