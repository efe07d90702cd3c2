use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    parse_date_str, parse_time_str, Appointment, AppointmentStatus, AvailabilitySlot,
    BookAppointmentRequest, ScheduleError,
};
use crate::stores::{AppointmentStore, AvailabilityStore};

const BOOKING_FIELDS: &str = "patient_id, doctor_id, appointment_date, appointment_time";

/// Books appointments against declared availability windows and keeps the
/// availability flags consistent when bookings are removed.
///
/// Booking never clears a slot's `is_available` flag; only cancellation
/// sets it back to `true`. That asymmetry is inherited load-bearing
/// behavior, as is the unguarded gap between the availability read and
/// the appointment insert (two callers racing for one window can both
/// succeed).
pub struct SchedulingService {
    appointments: AppointmentStore,
    availability: AvailabilityStore,
}

impl SchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        Self {
            appointments: AppointmentStore::new(Arc::clone(&supabase)),
            availability: AvailabilityStore::new(supabase),
        }
    }

    /// Validate a booking request, pick the slot it falls into, and
    /// persist the appointment as `Scheduled`.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, ScheduleError> {
        let patient_id = request.patient_id
            .ok_or(ScheduleError::MissingField(BOOKING_FIELDS))?;
        let doctor_id = request.doctor_id
            .ok_or(ScheduleError::MissingField(BOOKING_FIELDS))?;
        if request.appointment_date.trim().is_empty()
            || request.appointment_time.trim().is_empty()
        {
            return Err(ScheduleError::MissingField(BOOKING_FIELDS));
        }

        let date = parse_date_str(&request.appointment_date)
            .map_err(|e| ScheduleError::InvalidFormat(e.to_string()))?;
        let time = parse_time_str(&request.appointment_time)
            .map_err(|e| ScheduleError::InvalidFormat(e.to_string()))?;
        let appointment_at = date.and_time(time);

        debug!(
            "Booking request: patient {} with doctor {} at {}",
            patient_id, doctor_id, appointment_at
        );

        let slots = self.availability.list(Some(doctor_id), auth_token).await
            .map_err(|e| ScheduleError::Store(e.to_string()))?;

        let slot = first_open_slot(&slots, doctor_id, appointment_at)
            .ok_or_else(|| ScheduleError::NoAvailableSlot {
                doctor_id,
                date: request.appointment_date.clone(),
                time: request.appointment_time.clone(),
            })?;

        info!(
            "Booking appointment for patient {} with doctor {} in slot {}",
            patient_id, doctor_id, slot.availability_id
        );

        self.appointments
            .add(patient_id, doctor_id, slot.availability_id, date, time, auth_token)
            .await
            .map_err(|e| ScheduleError::Store(e.to_string()))
    }

    /// Release the slot behind the appointment, then delete it. The
    /// deletion goes ahead even when no slot can be found any more.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Option<i64>,
        auth_token: &str,
    ) -> Result<(), ScheduleError> {
        let appointment_id = appointment_id
            .ok_or(ScheduleError::MissingId("Appointment"))?;

        let appointment = self.appointments.get(appointment_id, auth_token).await
            .map_err(|e| ScheduleError::Store(e.to_string()))?
            .ok_or(ScheduleError::AppointmentNotFound(appointment_id))?;

        self.release_slot_for(&appointment, auth_token).await?;

        info!("Cancelling appointment {}", appointment_id);
        self.appointments.delete(appointment_id, auth_token).await
            .map_err(|e| ScheduleError::Store(e.to_string()))
    }

    /// Set the appointment's status. With no status supplied there is
    /// nothing to persist, so the current record is returned as-is.
    pub async fn update_appointment_status(
        &self,
        appointment_id: Option<i64>,
        status: Option<&str>,
        auth_token: &str,
    ) -> Result<Appointment, ScheduleError> {
        let appointment_id = appointment_id
            .ok_or(ScheduleError::MissingId("Appointment"))?;

        let status = match status {
            Some(raw) => Some(AppointmentStatus::parse(raw).ok_or(ScheduleError::InvalidStatus)?),
            None => None,
        };

        match status {
            Some(status) => self.appointments
                .update_status(appointment_id, status, auth_token)
                .await
                .map_err(|e| ScheduleError::Store(e.to_string()))?
                .ok_or(ScheduleError::AppointmentNotFound(appointment_id)),
            None => self.appointments
                .get(appointment_id, auth_token)
                .await
                .map_err(|e| ScheduleError::Store(e.to_string()))?
                .ok_or(ScheduleError::AppointmentNotFound(appointment_id)),
        }
    }

    pub async fn list_appointments(&self, auth_token: &str) -> Result<Vec<Appointment>, ScheduleError> {
        self.appointments.list(auth_token).await
            .map_err(|e| ScheduleError::Store(e.to_string()))
    }

    async fn release_slot_for(
        &self,
        appointment: &Appointment,
        auth_token: &str,
    ) -> Result<(), ScheduleError> {
        if let Some(slot_id) = appointment.slot_id {
            let released = self.availability
                .update(slot_id, available_again(), auth_token)
                .await
                .map_err(|e| ScheduleError::Store(e.to_string()))?;
            if released.is_none() {
                warn!(
                    "Slot {} referenced by appointment {} no longer exists",
                    slot_id, appointment.appointment_id
                );
            }
            return Ok(());
        }

        // Legacy rows carry no slot reference: find the window containing
        // the appointment instant, whatever its current flag says.
        let instant = appointment.appointment_date.and_time(appointment.appointment_time);
        let slots = self.availability
            .list(Some(appointment.doctor_id), auth_token)
            .await
            .map_err(|e| ScheduleError::Store(e.to_string()))?;

        if let Some(slot) = containing_slot(&slots, appointment.doctor_id, instant) {
            self.availability
                .update(slot.availability_id, available_again(), auth_token)
                .await
                .map_err(|e| ScheduleError::Store(e.to_string()))?;
        }
        Ok(())
    }
}

fn available_again() -> serde_json::Value {
    let mut patch = serde_json::Map::new();
    patch.insert("is_available".to_string(), serde_json::json!(true));
    serde_json::Value::Object(patch)
}

fn slot_window(slot: &AvailabilitySlot) -> (NaiveDateTime, NaiveDateTime) {
    (
        slot.available_date.and_time(slot.start_time),
        slot.available_date.and_time(slot.end_time),
    )
}

/// Half-open containment: the window includes its start and excludes its
/// end, so an instant exactly at `end_time` does not match.
fn slot_contains(slot: &AvailabilitySlot, instant: NaiveDateTime) -> bool {
    let (start, end) = slot_window(slot);
    start <= instant && instant < end
}

/// Bookable slot for the doctor at `instant`. When several windows
/// overlap the choice is deterministic: earliest window start, ties
/// broken by lowest availability id.
fn first_open_slot(
    slots: &[AvailabilitySlot],
    doctor_id: i64,
    instant: NaiveDateTime,
) -> Option<&AvailabilitySlot> {
    slots
        .iter()
        .filter(|slot| {
            slot.doctor_id == doctor_id && slot.is_available && slot_contains(slot, instant)
        })
        .min_by_key(|slot| (slot_window(slot).0, slot.availability_id))
}

/// Containing window regardless of the availability flag, used when a
/// cancelled appointment releases its slot.
fn containing_slot(
    slots: &[AvailabilitySlot],
    doctor_id: i64,
    instant: NaiveDateTime,
) -> Option<&AvailabilitySlot> {
    slots
        .iter()
        .filter(|slot| slot.doctor_id == doctor_id && slot_contains(slot, instant))
        .min_by_key(|slot| (slot_window(slot).0, slot.availability_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn slot(id: i64, doctor_id: i64, date: &str, start: &str, end: &str, open: bool) -> AvailabilitySlot {
        AvailabilitySlot {
            availability_id: id,
            doctor_id,
            available_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
            is_available: open,
        }
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M").unwrap())
    }

    #[test]
    fn window_includes_start_and_excludes_end() {
        let s = slot(1, 7, "2025-03-10", "09:00", "17:00", true);

        assert!(slot_contains(&s, at("2025-03-10", "09:00")));
        assert!(slot_contains(&s, at("2025-03-10", "16:59")));
        assert!(!slot_contains(&s, at("2025-03-10", "17:00")));
        assert!(!slot_contains(&s, at("2025-03-10", "08:59")));
        assert!(!slot_contains(&s, at("2025-03-11", "10:00")));
    }

    #[test]
    fn closed_and_foreign_slots_are_not_bookable() {
        let slots = vec![
            slot(1, 7, "2025-03-10", "09:00", "12:00", false),
            slot(2, 8, "2025-03-10", "09:00", "12:00", true),
        ];

        assert!(first_open_slot(&slots, 7, at("2025-03-10", "10:00")).is_none());
    }

    #[test]
    fn earliest_start_wins_among_overlapping_windows() {
        let slots = vec![
            slot(5, 7, "2025-03-10", "10:00", "12:00", true),
            slot(3, 7, "2025-03-10", "08:00", "12:00", true),
            slot(9, 7, "2025-03-10", "09:00", "12:00", true),
        ];

        let chosen = first_open_slot(&slots, 7, at("2025-03-10", "11:00")).unwrap();
        assert_eq!(chosen.availability_id, 3);
    }

    #[test]
    fn equal_starts_fall_back_to_lowest_id() {
        let slots = vec![
            slot(9, 7, "2025-03-10", "09:00", "12:00", true),
            slot(4, 7, "2025-03-10", "09:00", "11:00", true),
            slot(6, 7, "2025-03-10", "09:00", "13:00", true),
        ];

        let chosen = first_open_slot(&slots, 7, at("2025-03-10", "10:00")).unwrap();
        assert_eq!(chosen.availability_id, 4);
    }

    #[test]
    fn release_search_ignores_the_availability_flag() {
        let slots = vec![
            slot(1, 7, "2025-03-10", "09:00", "12:00", false),
        ];

        assert!(first_open_slot(&slots, 7, at("2025-03-10", "10:00")).is_none());
        let found = containing_slot(&slots, 7, at("2025-03-10", "10:00")).unwrap();
        assert_eq!(found.availability_id, 1);
    }
}
