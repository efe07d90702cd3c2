use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;

use billing_cell::models::{AddPaymentRequest, UpdatePaymentRequest};
use billing_cell::services::PaymentService;
use doctor_cell::models::{AddDoctorRequest, UpdateDoctorRequest};
use doctor_cell::services::DoctorService;
use patient_cell::models::{AddPatientRequest, UpdatePatientRequest};
use patient_cell::services::PatientService;
use records_cell::models::{AddMedicalRecordRequest, UpdateMedicalRecordRequest};
use records_cell::services::MedicalRecordService;
use scheduling_cell::models::{
    AddAvailabilityRequest, BookAppointmentRequest, UpdateAvailabilityRequest,
};
use scheduling_cell::services::{AvailabilityService, SchedulingService};
use shared_config::AppConfig;

const WATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Menu-driven console over the same services the HTTP handlers call.
/// Talks to the store with the service key, so no login step.
pub struct Console {
    patients: PatientService,
    doctors: DoctorService,
    availability: AvailabilityService,
    scheduling: SchedulingService,
    payments: PaymentService,
    records: MedicalRecordService,
    token: String,
}

fn prompt(label: &str) -> String {
    print!("{}", label);
    io::stdout().flush().ok();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

fn prompt_i64(label: &str) -> Option<i64> {
    prompt(label).parse().ok()
}

fn prompt_f64(label: &str) -> Option<f64> {
    prompt(label).parse().ok()
}

fn prompt_optional(label: &str) -> Option<String> {
    let raw = prompt(label);
    if raw.is_empty() { None } else { Some(raw) }
}

fn print_record<T: Serialize>(headline: &str, record: &T) {
    println!("{}", headline);
    print_json(record);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => println!("Display error: {}", e),
    }
}

impl Console {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            patients: PatientService::new(config),
            doctors: DoctorService::new(config),
            availability: AvailabilityService::new(config),
            scheduling: SchedulingService::new(config),
            payments: PaymentService::new(config),
            records: MedicalRecordService::new(config),
            token: config.supabase_key.clone(),
        }
    }

    pub async fn run(&self) {
        loop {
            println!("\n--- Main Management Menu ---");
            println!("1. Patient Operations");
            println!("2. Doctor Operations");
            println!("3. Availability Operations");
            println!("4. Appointment Operations");
            println!("5. Payment Operations");
            println!("6. Medical Record Operations");
            println!("7. Exit");

            match prompt("Select an option: ").as_str() {
                "1" => self.patient_menu().await,
                "2" => self.doctor_menu().await,
                "3" => self.availability_menu().await,
                "4" => self.appointment_menu().await,
                "5" => self.payment_menu().await,
                "6" => self.medical_record_menu().await,
                "7" => {
                    println!("Exiting...");
                    break;
                }
                _ => println!("Invalid option. Please try again."),
            }
        }
    }

    // ==============================================================================
    // PATIENT OPERATIONS
    // ==============================================================================

    async fn patient_menu(&self) {
        loop {
            println!("\n--- Patient Operations Menu ---");
            println!("1. Add Patient");
            println!("2. List Patients");
            println!("3. Update Patient");
            println!("4. Delete Patient");
            println!("5. Back to Main Menu");

            match prompt("Select an option: ").as_str() {
                "1" => self.add_patient().await,
                "2" => self.list_patients().await,
                "3" => self.update_patient().await,
                "4" => self.delete_patient().await,
                "5" => break,
                _ => println!("Invalid option. Please try again."),
            }
        }
    }

    async fn add_patient(&self) {
        let request = AddPatientRequest {
            full_name: prompt("Full Name: "),
            email: prompt("Email: "),
            phone: prompt("Phone: "),
            age: prompt_i64("Age: "),
            gender: prompt("Gender: "),
            address: prompt("Address: "),
        };

        match self.patients.add_patient(request, &self.token).await {
            Ok(patient) => print_record("Patient added successfully:", &patient),
            Err(e) => println!("Patient error: {}", e),
        }
    }

    async fn list_patients(&self) {
        match self.patients.list_patients(&self.token).await {
            Ok(patients) => print_json(&patients),
            Err(e) => println!("Patient error: {}", e),
        }
    }

    async fn update_patient(&self) {
        let patient_id = prompt_i64("Patient ID to update: ");
        let request = UpdatePatientRequest {
            phone: prompt_optional("New Phone (leave blank to skip): "),
            address: prompt_optional("New Address (leave blank to skip): "),
        };

        match self.patients.update_patient(patient_id, request, &self.token).await {
            Ok(patient) => print_record("Patient updated successfully:", &patient),
            Err(e) => println!("Patient error: {}", e),
        }
    }

    async fn delete_patient(&self) {
        let patient_id = prompt_i64("Patient ID to delete: ");

        match self.patients.delete_patient(patient_id, &self.token).await {
            Ok(()) => println!("Patient deleted successfully."),
            Err(e) => println!("Patient error: {}", e),
        }
    }

    // ==============================================================================
    // DOCTOR OPERATIONS
    // ==============================================================================

    async fn doctor_menu(&self) {
        loop {
            println!("\n--- Doctor Operations Menu ---");
            println!("1. Add Doctor");
            println!("2. List Doctors");
            println!("3. Update Doctor");
            println!("4. Delete Doctor");
            println!("5. Back to Main Menu");

            match prompt("Select an option: ").as_str() {
                "1" => self.add_doctor().await,
                "2" => self.list_doctors().await,
                "3" => self.update_doctor().await,
                "4" => self.delete_doctor().await,
                "5" => break,
                _ => println!("Invalid option. Please try again."),
            }
        }
    }

    async fn add_doctor(&self) {
        let request = AddDoctorRequest {
            full_name: prompt("Full Name: "),
            specialization: prompt("Specialization: "),
            email: prompt("Email: "),
            phone: prompt("Phone: "),
            experience_years: prompt_i64("Experience Years: "),
        };

        match self.doctors.add_doctor(request, &self.token).await {
            Ok(doctor) => print_record("Doctor added successfully:", &doctor),
            Err(e) => println!("Doctor error: {}", e),
        }
    }

    async fn list_doctors(&self) {
        match self.doctors.list_doctors(&self.token).await {
            Ok(doctors) => print_json(&doctors),
            Err(e) => println!("Doctor error: {}", e),
        }
    }

    async fn update_doctor(&self) {
        let doctor_id = prompt_i64("Doctor ID to update: ");
        let request = UpdateDoctorRequest {
            phone: prompt_optional("New Phone (leave blank to skip): "),
            specialization: prompt_optional("New Specialization (leave blank to skip): "),
        };

        match self.doctors.update_doctor(doctor_id, request, &self.token).await {
            Ok(doctor) => print_record("Doctor updated successfully:", &doctor),
            Err(e) => println!("Doctor error: {}", e),
        }
    }

    async fn delete_doctor(&self) {
        let doctor_id = prompt_i64("Doctor ID to delete: ");

        match self.doctors.delete_doctor(doctor_id, &self.token).await {
            Ok(()) => println!("Doctor deleted successfully."),
            Err(e) => println!("Doctor error: {}", e),
        }
    }

    // ==============================================================================
    // AVAILABILITY OPERATIONS
    // ==============================================================================

    async fn availability_menu(&self) {
        loop {
            println!("\n--- Availability Operations Menu ---");
            println!("1. Add Availability");
            println!("2. List Availability");
            println!("3. Update Availability");
            println!("4. Delete Availability");
            println!("5. Back to Main Menu");

            match prompt("Select an option: ").as_str() {
                "1" => self.add_availability().await,
                "2" => self.list_availability().await,
                "3" => self.update_availability().await,
                "4" => self.delete_availability().await,
                "5" => break,
                _ => println!("Invalid option. Please try again."),
            }
        }
    }

    async fn add_availability(&self) {
        let request = AddAvailabilityRequest {
            doctor_id: prompt_i64("Doctor ID: "),
            available_date: prompt("Available Date (YYYY-MM-DD): "),
            start_time: prompt("Start Time (HH:MM): "),
            end_time: prompt("End Time (HH:MM): "),
        };

        match self.availability.add_availability(request, &self.token).await {
            Ok(slot) => print_record("Availability added successfully:", &slot),
            Err(e) => println!("Availability error: {}", e),
        }
    }

    async fn list_availability(&self) {
        let doctor_id = prompt_i64("Doctor ID (leave blank for all): ");

        match self.availability.list_availability(doctor_id, &self.token).await {
            Ok(slots) => print_json(&slots),
            Err(e) => println!("Availability error: {}", e),
        }
    }

    async fn update_availability(&self) {
        let availability_id = prompt_i64("Availability ID to update: ");
        let is_available = match prompt("Is Available (true/false, leave blank to skip): ")
            .to_lowercase()
            .as_str()
        {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        };
        let request = UpdateAvailabilityRequest {
            is_available,
            start_time: prompt_optional("New Start Time (HH:MM, leave blank to skip): "),
            end_time: prompt_optional("New End Time (HH:MM, leave blank to skip): "),
            available_date: None,
        };

        match self.availability.update_availability(availability_id, request, &self.token).await {
            Ok(slot) => print_record("Availability updated successfully:", &slot),
            Err(e) => println!("Availability error: {}", e),
        }
    }

    async fn delete_availability(&self) {
        let availability_id = prompt_i64("Availability ID to delete: ");

        match self.availability.cancel_availability(availability_id, &self.token).await {
            Ok(()) => println!("Availability deleted successfully."),
            Err(e) => println!("Availability error: {}", e),
        }
    }

    // ==============================================================================
    // APPOINTMENT OPERATIONS
    // ==============================================================================

    async fn appointment_menu(&self) {
        loop {
            println!("\n--- Appointment Operations Menu ---");
            println!("1. Book Appointment");
            println!("2. List Appointments (Real-time view)");
            println!("3. Update Appointment Status");
            println!("4. Cancel Appointment");
            println!("5. Back to Main Menu");

            match prompt("Select an option: ").as_str() {
                "1" => self.book_appointment().await,
                "2" => self.watch_appointments().await,
                "3" => self.update_appointment_status().await,
                "4" => self.cancel_appointment().await,
                "5" => break,
                _ => println!("Invalid option. Please try again."),
            }
        }
    }

    async fn book_appointment(&self) {
        let request = BookAppointmentRequest {
            patient_id: prompt_i64("Patient ID: "),
            doctor_id: prompt_i64("Doctor ID: "),
            appointment_date: prompt("Appointment Date (YYYY-MM-DD): "),
            appointment_time: prompt("Appointment Time (HH:MM): "),
        };

        match self.scheduling.book_appointment(request, &self.token).await {
            Ok(appointment) => print_record("Appointment booked successfully:", &appointment),
            Err(e) => println!("Appointment error: {}", e),
        }
    }

    async fn watch_appointments(&self) {
        loop {
            match self.scheduling.list_appointments(&self.token).await {
                Ok(appointments) => {
                    println!("\n--- Current Appointments (Refreshing every 5 seconds) ---");
                    print_json(&appointments);
                }
                Err(e) => println!("Appointment error: {}", e),
            }

            tokio::time::sleep(WATCH_INTERVAL).await;
            println!("\nPress 'q' to quit viewing, or any other key to continue...");
            if prompt("").eq_ignore_ascii_case("q") {
                break;
            }
        }
    }

    async fn update_appointment_status(&self) {
        let appointment_id = prompt_i64("Appointment ID to update: ");
        let status = prompt_optional("New Status (Scheduled/Completed/Cancelled, leave blank to skip): ");

        match self
            .scheduling
            .update_appointment_status(appointment_id, status.as_deref(), &self.token)
            .await
        {
            Ok(appointment) => print_record("Appointment updated successfully:", &appointment),
            Err(e) => println!("Appointment error: {}", e),
        }
    }

    async fn cancel_appointment(&self) {
        let appointment_id = prompt_i64("Appointment ID to cancel: ");

        match self.scheduling.cancel_appointment(appointment_id, &self.token).await {
            Ok(()) => println!("Appointment cancelled successfully."),
            Err(e) => println!("Appointment error: {}", e),
        }
    }

    // ==============================================================================
    // PAYMENT OPERATIONS
    // ==============================================================================

    async fn payment_menu(&self) {
        loop {
            println!("\n--- Payment Operations Menu ---");
            println!("1. Add Payment");
            println!("2. List Payments");
            println!("3. Update Payment");
            println!("4. Delete Payment");
            println!("5. Back to Main Menu");

            match prompt("Select an option: ").as_str() {
                "1" => self.add_payment().await,
                "2" => self.list_payments().await,
                "3" => self.update_payment().await,
                "4" => self.delete_payment().await,
                "5" => break,
                _ => println!("Invalid option. Please try again."),
            }
        }
    }

    async fn add_payment(&self) {
        let request = AddPaymentRequest {
            appointment_id: prompt_i64("Appointment ID: "),
            patient_id: prompt_i64("Patient ID: "),
            amount: prompt_f64("Amount: "),
            transaction_id: prompt_optional("Transaction ID (leave blank to skip): "),
        };

        match self.payments.add_payment(request, &self.token).await {
            Ok(payment) => print_record("Payment added successfully:", &payment),
            Err(e) => println!("Payment error: {}", e),
        }
    }

    async fn list_payments(&self) {
        match self.payments.list_payments(&self.token).await {
            Ok(payments) => print_json(&payments),
            Err(e) => println!("Payment error: {}", e),
        }
    }

    async fn update_payment(&self) {
        let payment_id = prompt_i64("Payment ID to update: ");
        let request = UpdatePaymentRequest {
            payment_status: prompt_optional("New Status (Pending/Completed/Failed, leave blank to skip): "),
        };

        match self.payments.update_payment(payment_id, request, &self.token).await {
            Ok(payment) => print_record("Payment updated successfully:", &payment),
            Err(e) => println!("Payment error: {}", e),
        }
    }

    async fn delete_payment(&self) {
        let payment_id = prompt_i64("Payment ID to delete: ");

        match self.payments.delete_payment(payment_id, &self.token).await {
            Ok(()) => println!("Payment deleted successfully."),
            Err(e) => println!("Payment error: {}", e),
        }
    }

    // ==============================================================================
    // MEDICAL RECORD OPERATIONS
    // ==============================================================================

    async fn medical_record_menu(&self) {
        loop {
            println!("\n--- Medical Record Operations Menu ---");
            println!("1. Add Medical Record");
            println!("2. List Medical Records");
            println!("3. Update Medical Record");
            println!("4. Delete Medical Record");
            println!("5. Back to Main Menu");

            match prompt("Select an option: ").as_str() {
                "1" => self.add_medical_record().await,
                "2" => self.list_medical_records().await,
                "3" => self.update_medical_record().await,
                "4" => self.delete_medical_record().await,
                "5" => break,
                _ => println!("Invalid option. Please try again."),
            }
        }
    }

    async fn add_medical_record(&self) {
        let request = AddMedicalRecordRequest {
            patient_id: prompt_i64("Patient ID: "),
            doctor_id: prompt_i64("Doctor ID: "),
            appointment_id: prompt_i64("Appointment ID: "),
            diagnosis: prompt("Diagnosis: "),
            prescription: prompt("Prescription: "),
        };

        match self.records.add_medical_record(request, &self.token).await {
            Ok(record) => print_record("Medical record added successfully:", &record),
            Err(e) => println!("Medical record error: {}", e),
        }
    }

    async fn list_medical_records(&self) {
        match self.records.list_medical_records(&self.token).await {
            Ok(records) => print_json(&records),
            Err(e) => println!("Medical record error: {}", e),
        }
    }

    async fn update_medical_record(&self) {
        let record_id = prompt_i64("Record ID to update: ");
        let request = UpdateMedicalRecordRequest {
            diagnosis: prompt_optional("New Diagnosis (leave blank to skip): "),
            prescription: prompt_optional("New Prescription (leave blank to skip): "),
        };

        match self.records.update_medical_record(record_id, request, &self.token).await {
            Ok(record) => print_record("Medical record updated successfully:", &record),
            Err(e) => println!("Medical record error: {}", e),
        }
    }

    async fn delete_medical_record(&self) {
        let record_id = prompt_i64("Record ID to delete: ");

        match self.records.delete_medical_record(record_id, &self.token).await {
            Ok(()) => println!("Medical record deleted successfully."),
            Err(e) => println!("Medical record error: {}", e),
        }
    }
}
