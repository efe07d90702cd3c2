use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AddDoctorRequest, Doctor, DoctorError, UpdateDoctorRequest};

const TABLE_PATH: &str = "/rest/v1/doctors";

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn add_doctor(
        &self,
        request: AddDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        if request.full_name.trim().is_empty() || request.email.trim().is_empty() {
            return Err(DoctorError::MissingField);
        }
        let experience_years = match request.experience_years {
            Some(years) if years >= 0 => years,
            _ => return Err(DoctorError::InvalidExperience),
        };

        debug!("Adding doctor {}", request.full_name);

        let doctor_data = json!({
            "full_name": request.full_name,
            "specialization": request.specialization,
            "email": request.email,
            "phone": request.phone,
            "experience_years": experience_years
        });

        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            TABLE_PATH,
            Some(auth_token),
            Some(doctor_data),
            Some(return_representation()),
        ).await.map_err(|e| DoctorError::Store(e.to_string()))?;

        let row = rows.first()
            .ok_or_else(|| DoctorError::Store("Doctor insert returned no rows".to_string()))?;
        serde_json::from_value(row.clone())
            .map_err(|e| DoctorError::Store(e.to_string()))
    }

    pub async fn list_doctors(&self, auth_token: &str) -> Result<Vec<Doctor>, DoctorError> {
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            TABLE_PATH,
            Some(auth_token),
            None,
        ).await.map_err(|e| DoctorError::Store(e.to_string()))?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| DoctorError::Store(e.to_string())))
            .collect()
    }

    pub async fn update_doctor(
        &self,
        doctor_id: Option<i64>,
        request: UpdateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        let doctor_id = doctor_id.ok_or(DoctorError::MissingId)?;

        let mut update_data = serde_json::Map::new();
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(specialization) = request.specialization {
            update_data.insert("specialization".to_string(), json!(specialization));
        }
        if update_data.is_empty() {
            return Err(DoctorError::EmptyUpdate);
        }

        info!("Updating doctor {}", doctor_id);

        let path = format!("{}?doctor_id=eq.{}", TABLE_PATH, doctor_id);
        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(Value::Object(update_data)),
            Some(return_representation()),
        ).await.map_err(|e| DoctorError::Store(e.to_string()))?;

        let row = rows.first().ok_or(DoctorError::NotFound(doctor_id))?;
        serde_json::from_value(row.clone())
            .map_err(|e| DoctorError::Store(e.to_string()))
    }

    /// Removal is idempotent; deleting an absent doctor is not an error.
    pub async fn delete_doctor(
        &self,
        doctor_id: Option<i64>,
        auth_token: &str,
    ) -> Result<(), DoctorError> {
        let doctor_id = doctor_id.ok_or(DoctorError::MissingId)?;

        info!("Deleting doctor {}", doctor_id);

        let path = format!("{}?doctor_id=eq.{}", TABLE_PATH, doctor_id);
        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
            Some(return_representation()),
        ).await.map_err(|e| DoctorError::Store(e.to_string()))?;

        Ok(())
    }
}

fn return_representation() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));
    headers
}
