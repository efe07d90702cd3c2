use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AddMedicalRecordRequest, MedicalRecord, MedicalRecordError, UpdateMedicalRecordRequest,
};

const TABLE_PATH: &str = "/rest/v1/medical_records";

pub struct MedicalRecordService {
    supabase: SupabaseClient,
}

impl MedicalRecordService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn add_medical_record(
        &self,
        request: AddMedicalRecordRequest,
        auth_token: &str,
    ) -> Result<MedicalRecord, MedicalRecordError> {
        let patient_id = request.patient_id.ok_or(MedicalRecordError::MissingField)?;
        let doctor_id = request.doctor_id.ok_or(MedicalRecordError::MissingField)?;
        let appointment_id = request.appointment_id.ok_or(MedicalRecordError::MissingField)?;
        if request.diagnosis.trim().is_empty() || request.prescription.trim().is_empty() {
            return Err(MedicalRecordError::MissingField);
        }

        debug!("Adding medical record for patient {} from appointment {}", patient_id, appointment_id);

        let record_data = json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "appointment_id": appointment_id,
            "diagnosis": request.diagnosis,
            "prescription": request.prescription
        });

        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            TABLE_PATH,
            Some(auth_token),
            Some(record_data),
            Some(return_representation()),
        ).await.map_err(|e| MedicalRecordError::Store(e.to_string()))?;

        let row = rows.first()
            .ok_or_else(|| MedicalRecordError::Store("Record insert returned no rows".to_string()))?;
        serde_json::from_value(row.clone())
            .map_err(|e| MedicalRecordError::Store(e.to_string()))
    }

    pub async fn list_medical_records(
        &self,
        auth_token: &str,
    ) -> Result<Vec<MedicalRecord>, MedicalRecordError> {
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            TABLE_PATH,
            Some(auth_token),
            None,
        ).await.map_err(|e| MedicalRecordError::Store(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| MedicalRecordError::Store(e.to_string()))
            })
            .collect()
    }

    pub async fn update_medical_record(
        &self,
        record_id: Option<i64>,
        request: UpdateMedicalRecordRequest,
        auth_token: &str,
    ) -> Result<MedicalRecord, MedicalRecordError> {
        let record_id = record_id.ok_or(MedicalRecordError::MissingId)?;

        let mut update_data = serde_json::Map::new();
        if let Some(diagnosis) = request.diagnosis {
            update_data.insert("diagnosis".to_string(), json!(diagnosis));
        }
        if let Some(prescription) = request.prescription {
            update_data.insert("prescription".to_string(), json!(prescription));
        }
        if update_data.is_empty() {
            return Err(MedicalRecordError::EmptyUpdate);
        }

        info!("Updating medical record {}", record_id);

        let path = format!("{}?record_id=eq.{}", TABLE_PATH, record_id);
        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(Value::Object(update_data)),
            Some(return_representation()),
        ).await.map_err(|e| MedicalRecordError::Store(e.to_string()))?;

        let row = rows.first().ok_or(MedicalRecordError::NotFound(record_id))?;
        serde_json::from_value(row.clone())
            .map_err(|e| MedicalRecordError::Store(e.to_string()))
    }

    /// Removal is idempotent; deleting an absent record is not an error.
    pub async fn delete_medical_record(
        &self,
        record_id: Option<i64>,
        auth_token: &str,
    ) -> Result<(), MedicalRecordError> {
        let record_id = record_id.ok_or(MedicalRecordError::MissingId)?;

        info!("Deleting medical record {}", record_id);

        let path = format!("{}?record_id=eq.{}", TABLE_PATH, record_id);
        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
            Some(return_representation()),
        ).await.map_err(|e| MedicalRecordError::Store(e.to_string()))?;

        Ok(())
    }
}

fn return_representation() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));
    headers
}
