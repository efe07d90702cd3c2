use std::sync::Arc;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_key: self.supabase_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            role: "user".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(username: &str, email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn receptionist(username: &str) -> Self {
        Self::new(username, &format!("{}@clinic.test", username), "receptionist")
    }

    pub fn admin(username: &str) -> Self {
        Self::new(username, &format!("{}@clinic.test", username), "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: Some(self.username.clone()),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "username": user.username,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned PostgREST row bodies for wiremock fixtures.
pub struct MockStoreRows;

impl MockStoreRows {
    pub fn patient(patient_id: i64, full_name: &str, email: &str) -> serde_json::Value {
        json!({
            "patient_id": patient_id,
            "full_name": full_name,
            "email": email,
            "phone": "0851234567",
            "age": 34,
            "gender": "F",
            "address": "12 Harbour Row"
        })
    }

    pub fn doctor(doctor_id: i64, full_name: &str, email: &str) -> serde_json::Value {
        json!({
            "doctor_id": doctor_id,
            "full_name": full_name,
            "specialization": "Cardiology",
            "email": email,
            "phone": "0867654321",
            "experience_years": 11
        })
    }

    pub fn slot(
        availability_id: i64,
        doctor_id: i64,
        date: &str,
        start_time: &str,
        end_time: &str,
        is_available: bool,
    ) -> serde_json::Value {
        json!({
            "availability_id": availability_id,
            "doctor_id": doctor_id,
            "available_date": date,
            "start_time": start_time,
            "end_time": end_time,
            "is_available": is_available
        })
    }

    pub fn appointment(
        appointment_id: i64,
        patient_id: i64,
        doctor_id: i64,
        slot_id: Option<i64>,
        date: &str,
        time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "slot_id": slot_id,
            "appointment_date": date,
            "appointment_time": time,
            "status": status
        })
    }

    pub fn payment(payment_id: i64, appointment_id: i64, patient_id: i64, amount: f64) -> serde_json::Value {
        json!({
            "payment_id": payment_id,
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "amount": amount,
            "payment_status": "Pending",
            "transaction_id": null
        })
    }

    pub fn medical_record(record_id: i64, patient_id: i64, doctor_id: i64, appointment_id: i64) -> serde_json::Value {
        json!({
            "record_id": record_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "appointment_id": appointment_id,
            "diagnosis": "Seasonal rhinitis",
            "prescription": "Loratadine 10mg once daily"
        })
    }

    pub fn account(user_id: &str, username: &str, email: &str, password_hash: &str) -> serde_json::Value {
        json!({
            "user_id": user_id,
            "username": username,
            "email": email,
            "password_hash": password_hash,
            "created_at": "2025-01-01T00:00:00Z"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.supabase_key, "test-service-key");
        assert!(!app_config.jwt_secret.is_empty());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::receptionist("frontdesk");
        assert_eq!(user.username, "frontdesk");
        assert_eq!(user.role, "receptionist");

        let user_model = user.to_user();
        assert_eq!(user_model.username, Some(user.username.clone()));
        assert_eq!(user_model.role, Some(user.role.clone()));
        assert_eq!(user_model.id, user.id);
    }

    #[test]
    fn test_jwt_token_creation() {
        let user = TestUser::default();
        let secret = "test-secret";
        let token = JwtTestUtils::create_test_token(&user, secret, Some(1));

        assert!(token.contains('.'));
        assert_eq!(token.split('.').count(), 3);
    }
}
