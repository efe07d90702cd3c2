use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A doctor-declared availability window for a single calendar date.
///
/// `is_available` is flipped back to `true` when an appointment booked
/// inside the window is cancelled; nothing else mutates a stored slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub availability_id: i64,
    pub doctor_id: i64,
    pub available_date: NaiveDate,
    #[serde(with = "timefmt")]
    pub start_time: NaiveTime,
    #[serde(with = "timefmt")]
    pub end_time: NaiveTime,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    /// Slot the booking landed in. Null on rows persisted before slot
    /// references were recorded; cancellation then falls back to matching
    /// the appointment instant against the doctor's windows.
    #[serde(default)]
    pub slot_id: Option<i64>,
    pub appointment_date: NaiveDate,
    #[serde(with = "timefmt")]
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Scheduled" => Some(AppointmentStatus::Scheduled),
            "Completed" => Some(AppointmentStatus::Completed),
            "Cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw field values collected by a caller (form or console). Dates and
/// times arrive as uninterpreted strings so validation failures surface
/// as typed errors instead of body-rejection noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default)]
    pub appointment_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAvailabilityRequest {
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub available_date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub is_available: Option<bool>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub available_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum ScheduleError {
    #[error("All fields ({0}) are required.")]
    MissingField(&'static str),

    #[error("{0} ID is required.")]
    MissingId(&'static str),

    #[error("Invalid date or time format. Use YYYY-MM-DD for date and HH:MM for time. Error: {0}")]
    InvalidFormat(String),

    #[error("Status must be 'Scheduled', 'Completed', or 'Cancelled'.")]
    InvalidStatus,

    #[error("{0}")]
    InvalidSlot(String),

    #[error("At least one field (is_available, start_time, end_time, available_date) must be provided.")]
    EmptyUpdate,

    #[error("No available slot for doctor_id {doctor_id} at {date} {time}.")]
    NoAvailableSlot {
        doctor_id: i64,
        date: String,
        time: String,
    },

    #[error("Appointment ID {0} not found.")]
    AppointmentNotFound(i64),

    #[error("Availability ID {0} not found.")]
    SlotNotFound(i64),

    #[error("Store error: {0}")]
    Store(String),
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date_str(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
}

/// Parse a time of day in `HH:MM` or `HH:MM:SS` form; seconds are dropped.
pub fn parse_time_str(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    let parsed = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))?;
    Ok(parsed.with_second(0).unwrap_or(parsed))
}

/// Wire format for times: stored as `HH:MM`, read back as either `HH:MM`
/// or the `HH:MM:SS` shape PostgREST time columns produce.
pub mod timefmt {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_str(&raw).map_err(serde::de::Error::custom)
    }
}
