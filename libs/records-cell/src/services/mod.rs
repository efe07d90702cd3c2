pub mod medical_record;

pub use medical_record::MedicalRecordService;
