use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_utils::jwt::issue_token;

use crate::models::{AuthError, LoginRequest, SignupRequest, UserAccount};

const TABLE_PATH: &str = "/rest/v1/users";
const TOKEN_TTL_HOURS: i64 = 24;

/// Staff account management backed by the users table. Passwords are
/// stored as salted Argon2 hashes only.
pub struct AccountService {
    supabase: SupabaseClient,
    jwt_secret: String,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    pub async fn signup(
        &self,
        request: SignupRequest,
        auth_token: &str,
    ) -> Result<UserAccount, AuthError> {
        if request.username.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(AuthError::MissingField);
        }

        debug!("Signing up account {}", request.username);

        let existing = self.find_by_username(&request.username, auth_token).await?;
        if existing.is_some() {
            return Err(AuthError::UsernameTaken(request.username));
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| AuthError::Credential(e.to_string()))?;

        let account_data = json!({
            "user_id": Uuid::new_v4(),
            "username": request.username,
            "email": request.email,
            "password_hash": password_hash
        });

        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            TABLE_PATH,
            Some(auth_token),
            Some(account_data),
            Some(return_representation()),
        ).await.map_err(|e| AuthError::Store(e.to_string()))?;

        let row = rows.first()
            .ok_or_else(|| AuthError::Store("Account insert returned no rows".to_string()))?;
        let account: UserAccount = serde_json::from_value(row.clone())
            .map_err(|e| AuthError::Store(e.to_string()))?;

        info!("Account {} created", account.username);
        Ok(account)
    }

    /// Verify credentials and mint a session token. The same error
    /// covers an unknown username and a wrong password.
    pub async fn login(
        &self,
        request: LoginRequest,
        auth_token: &str,
    ) -> Result<(String, UserAccount), AuthError> {
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let account = match self.find_by_username(&request.username, auth_token).await? {
            Some(account) => account,
            None => {
                warn!("Login attempt for unknown account {}", request.username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let verified = verify_password(&request.password, &account.password_hash)
            .map_err(|e| AuthError::Credential(e.to_string()))?;
        if !verified {
            warn!("Failed login for account {}", account.username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = issue_token(
            &account.user_id.to_string(),
            &account.username,
            &account.email,
            &self.jwt_secret,
            TOKEN_TTL_HOURS,
        )
        .map_err(AuthError::Credential)?;

        info!("Account {} logged in", account.username);
        Ok((token, account))
    }

    async fn find_by_username(
        &self,
        username: &str,
        auth_token: &str,
    ) -> Result<Option<UserAccount>, AuthError> {
        let path = format!("{}?username=eq.{}", TABLE_PATH, username);
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| AuthError::Store(e.to_string()))?;

        match rows.first() {
            Some(row) => {
                let account = serde_json::from_value(row.clone())
                    .map_err(|e| AuthError::Store(e.to_string()))?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

fn return_representation() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("correct horse battery staple").unwrap();
        let second = hash_password("correct horse battery staple").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("correct horse battery staple", &first).unwrap());
        assert!(verify_password("correct horse battery staple", &second).unwrap());
    }

    #[test]
    fn wrong_passwords_fail_verification() {
        let hash = hash_password("correct horse battery staple").unwrap();

        assert!(!verify_password("incorrect horse", &hash).unwrap());
    }

    #[test]
    fn malformed_hashes_are_errors_not_mismatches() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
