pub mod appointment;
pub mod availability;

pub use appointment::AppointmentStore;
pub use availability::AvailabilityStore;
