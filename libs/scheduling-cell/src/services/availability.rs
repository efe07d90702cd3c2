use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    parse_date_str, parse_time_str, AddAvailabilityRequest, AvailabilitySlot, ScheduleError,
    UpdateAvailabilityRequest,
};
use crate::stores::AvailabilityStore;

const SLOT_FIELDS: &str = "doctor_id, available_date, start_time, end_time";

/// Manages the availability windows doctors publish for booking.
pub struct AvailabilityService {
    store: AvailabilityStore,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: AvailabilityStore::new(Arc::new(SupabaseClient::new(config))),
        }
    }

    /// Validate and insert a new availability window, open for booking.
    pub async fn add_availability(
        &self,
        request: AddAvailabilityRequest,
        auth_token: &str,
    ) -> Result<AvailabilitySlot, ScheduleError> {
        let doctor_id = request.doctor_id
            .ok_or(ScheduleError::MissingField(SLOT_FIELDS))?;
        if request.available_date.trim().is_empty()
            || request.start_time.trim().is_empty()
            || request.end_time.trim().is_empty()
        {
            return Err(ScheduleError::MissingField(SLOT_FIELDS));
        }

        let date = parse_date_str(&request.available_date)
            .map_err(|_| ScheduleError::InvalidSlot("Invalid date format. Use YYYY-MM-DD.".to_string()))?;
        let start = parse_time_str(&request.start_time).map_err(|_| {
            ScheduleError::InvalidSlot(format!(
                "Invalid start time '{}'. Use HH:MM.",
                request.start_time
            ))
        })?;
        let end = parse_time_str(&request.end_time).map_err(|_| {
            ScheduleError::InvalidSlot(format!(
                "Invalid end time '{}'. Use HH:MM.",
                request.end_time
            ))
        })?;
        if start >= end {
            return Err(ScheduleError::InvalidSlot(
                "Start time must be before end time.".to_string(),
            ));
        }

        info!(
            "Adding availability for doctor {} on {} {}-{}",
            doctor_id, date, start, end
        );

        self.store.add(doctor_id, date, start, end, auth_token).await
            .map_err(|e| ScheduleError::Store(e.to_string()))
    }

    pub async fn list_availability(
        &self,
        doctor_id: Option<i64>,
        auth_token: &str,
    ) -> Result<Vec<AvailabilitySlot>, ScheduleError> {
        self.store.list(doctor_id, auth_token).await
            .map_err(|e| ScheduleError::Store(e.to_string()))
    }

    /// Apply a partial update to a window. Supplied times are re-parsed
    /// and, when both ends change, re-checked for ordering.
    pub async fn update_availability(
        &self,
        availability_id: Option<i64>,
        request: UpdateAvailabilityRequest,
        auth_token: &str,
    ) -> Result<AvailabilitySlot, ScheduleError> {
        let availability_id = availability_id
            .ok_or(ScheduleError::MissingId("Availability"))?;

        let mut patch = serde_json::Map::new();

        if let Some(is_available) = request.is_available {
            patch.insert("is_available".to_string(), serde_json::json!(is_available));
        }

        let start = match &request.start_time {
            Some(raw) => {
                let parsed = parse_time_str(raw).map_err(|_| {
                    ScheduleError::InvalidSlot(format!("Invalid start time '{}'. Use HH:MM.", raw))
                })?;
                patch.insert(
                    "start_time".to_string(),
                    serde_json::json!(parsed.format("%H:%M").to_string()),
                );
                Some(parsed)
            }
            None => None,
        };
        let end = match &request.end_time {
            Some(raw) => {
                let parsed = parse_time_str(raw).map_err(|_| {
                    ScheduleError::InvalidSlot(format!("Invalid end time '{}'. Use HH:MM.", raw))
                })?;
                patch.insert(
                    "end_time".to_string(),
                    serde_json::json!(parsed.format("%H:%M").to_string()),
                );
                Some(parsed)
            }
            None => None,
        };
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(ScheduleError::InvalidSlot(
                    "Start time must be before end time.".to_string(),
                ));
            }
        }

        if let Some(raw) = &request.available_date {
            let parsed = parse_date_str(raw).map_err(|_| {
                ScheduleError::InvalidSlot("Invalid date format. Use YYYY-MM-DD.".to_string())
            })?;
            patch.insert(
                "available_date".to_string(),
                serde_json::json!(parsed.format("%Y-%m-%d").to_string()),
            );
        }

        if patch.is_empty() {
            return Err(ScheduleError::EmptyUpdate);
        }

        info!("Updating availability {}", availability_id);

        self.store
            .update(availability_id, serde_json::Value::Object(patch), auth_token)
            .await
            .map_err(|e| ScheduleError::Store(e.to_string()))?
            .ok_or(ScheduleError::SlotNotFound(availability_id))
    }

    /// Remove a window outright. Booked appointments keep their own
    /// date and time, so they are left untouched.
    pub async fn cancel_availability(
        &self,
        availability_id: Option<i64>,
        auth_token: &str,
    ) -> Result<(), ScheduleError> {
        let availability_id = availability_id
            .ok_or(ScheduleError::MissingId("Availability"))?;

        info!("Cancelling availability {}", availability_id);
        self.store.delete(availability_id, auth_token).await
            .map_err(|e| ScheduleError::Store(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // Validation runs before any store call, so a service pointed at an
    // unreachable endpoint still exercises these paths.
    fn offline_service() -> AvailabilityService {
        AvailabilityService::new(&AppConfig {
            supabase_url: "http://127.0.0.1:1".to_string(),
            supabase_key: "offline".to_string(),
            jwt_secret: "offline".to_string(),
        })
    }

    #[tokio::test]
    async fn update_with_no_fields_is_rejected() {
        let service = offline_service();
        let request = UpdateAvailabilityRequest {
            is_available: None,
            start_time: None,
            end_time: None,
            available_date: None,
        };

        let err = service.update_availability(Some(1), request, "token").await.unwrap_err();
        assert_matches!(err, ScheduleError::EmptyUpdate);
    }

    #[tokio::test]
    async fn add_rejects_inverted_window() {
        let service = offline_service();
        let request = AddAvailabilityRequest {
            doctor_id: Some(7),
            available_date: "2025-03-10".to_string(),
            start_time: "15:00".to_string(),
            end_time: "09:00".to_string(),
        };

        let err = service.add_availability(request, "token").await.unwrap_err();
        assert_matches!(err, ScheduleError::InvalidSlot(message) => {
            assert_eq!(message, "Start time must be before end time.");
        });
    }

    #[tokio::test]
    async fn add_rejects_zero_length_window() {
        let service = offline_service();
        let request = AddAvailabilityRequest {
            doctor_id: Some(7),
            available_date: "2025-03-10".to_string(),
            start_time: "09:00".to_string(),
            end_time: "09:00".to_string(),
        };

        let err = service.add_availability(request, "token").await.unwrap_err();
        assert_matches!(err, ScheduleError::InvalidSlot(_));
    }

    #[tokio::test]
    async fn update_without_id_is_rejected() {
        let service = offline_service();
        let request = UpdateAvailabilityRequest {
            is_available: Some(false),
            start_time: None,
            end_time: None,
            available_date: None,
        };

        let err = service.update_availability(None, request, "token").await.unwrap_err();
        assert_matches!(err, ScheduleError::MissingId("Availability"));
    }
}
