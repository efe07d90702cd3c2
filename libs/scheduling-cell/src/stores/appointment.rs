use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, AppointmentStatus};
use crate::stores::availability::return_representation;

const TABLE_PATH: &str = "/rest/v1/appointments";

pub struct AppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl AppointmentStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Insert a freshly validated booking. Every new appointment starts
    /// out `Scheduled` and records the slot it landed in.
    pub async fn add(
        &self,
        patient_id: i64,
        doctor_id: i64,
        slot_id: i64,
        appointment_date: NaiveDate,
        appointment_time: NaiveTime,
        auth_token: &str,
    ) -> Result<Appointment> {
        debug!(
            "Inserting appointment for patient {} with doctor {} in slot {}",
            patient_id, doctor_id, slot_id
        );

        let appointment_data = json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "slot_id": slot_id,
            "appointment_date": appointment_date.format("%Y-%m-%d").to_string(),
            "appointment_time": appointment_time.format("%H:%M").to_string(),
            "status": AppointmentStatus::Scheduled.as_str()
        });

        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            TABLE_PATH,
            Some(auth_token),
            Some(appointment_data),
            Some(return_representation()),
        ).await?;

        let row = rows.first()
            .ok_or_else(|| anyhow!("Appointment insert returned no rows"))?;
        Ok(serde_json::from_value(row.clone())?)
    }

    pub async fn get(&self, appointment_id: i64, auth_token: &str) -> Result<Option<Appointment>> {
        let path = format!("{}?appointment_id=eq.{}", TABLE_PATH, appointment_id);
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        match rows.first() {
            Some(row) => Ok(Some(serde_json::from_value(row.clone())?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, auth_token: &str) -> Result<Vec<Appointment>> {
        let path = format!(
            "{}?order=appointment_date.asc,appointment_time.asc",
            TABLE_PATH
        );
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let appointments = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(appointments)
    }

    /// Returns `None` when no row carries the id.
    pub async fn update_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
        auth_token: &str,
    ) -> Result<Option<Appointment>> {
        debug!("Updating appointment {} to status {}", appointment_id, status);

        let path = format!("{}?appointment_id=eq.{}", TABLE_PATH, appointment_id);
        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "status": status.as_str() })),
            Some(return_representation()),
        ).await?;

        match rows.first() {
            Some(row) => Ok(Some(serde_json::from_value(row.clone())?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, appointment_id: i64, auth_token: &str) -> Result<()> {
        debug!("Deleting appointment {}", appointment_id);

        let path = format!("{}?appointment_id=eq.{}", TABLE_PATH, appointment_id);
        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
            Some(return_representation()),
        ).await?;

        Ok(())
    }
}
