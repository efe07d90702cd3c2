use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};
use tracing::debug;

use shared_database::supabase::SupabaseClient;

use crate::models::AvailabilitySlot;

const TABLE_PATH: &str = "/rest/v1/doctor_availability";

/// Gateway to the availability table. Rows come back ordered by date and
/// start time so listings read chronologically; the engine never relies
/// on that order for slot choice.
pub struct AvailabilityStore {
    supabase: Arc<SupabaseClient>,
}

impl AvailabilityStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn add(
        &self,
        doctor_id: i64,
        available_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        auth_token: &str,
    ) -> Result<AvailabilitySlot> {
        debug!("Adding availability for doctor {} on {}", doctor_id, available_date);

        let slot_data = json!({
            "doctor_id": doctor_id,
            "available_date": available_date.format("%Y-%m-%d").to_string(),
            "start_time": start_time.format("%H:%M").to_string(),
            "end_time": end_time.format("%H:%M").to_string(),
            "is_available": true
        });

        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            TABLE_PATH,
            Some(auth_token),
            Some(slot_data),
            Some(return_representation()),
        ).await?;

        let row = rows.first()
            .ok_or_else(|| anyhow!("Availability insert returned no rows"))?;
        Ok(serde_json::from_value(row.clone())?)
    }

    pub async fn list(&self, doctor_id: Option<i64>, auth_token: &str) -> Result<Vec<AvailabilitySlot>> {
        let path = match doctor_id {
            Some(id) => format!(
                "{}?doctor_id=eq.{}&order=available_date.asc,start_time.asc",
                TABLE_PATH, id
            ),
            None => format!("{}?order=available_date.asc,start_time.asc", TABLE_PATH),
        };

        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let slots = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(slots)
    }

    /// Partial update; only the supplied columns change. Returns `None`
    /// when no row carries the id.
    pub async fn update(
        &self,
        availability_id: i64,
        fields: Value,
        auth_token: &str,
    ) -> Result<Option<AvailabilitySlot>> {
        debug!("Updating availability slot {}", availability_id);

        let path = format!("{}?availability_id=eq.{}", TABLE_PATH, availability_id);
        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(fields),
            Some(return_representation()),
        ).await?;

        match rows.first() {
            Some(row) => Ok(Some(serde_json::from_value(row.clone())?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, availability_id: i64, auth_token: &str) -> Result<()> {
        debug!("Deleting availability slot {}", availability_id);

        let path = format!("{}?availability_id=eq.{}", TABLE_PATH, availability_id);
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

pub(crate) fn return_representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}
