use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::jwt;

use crate::models::{AuthError, LoginRequest, SignupRequest};
use crate::services::AccountService;

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

fn map_auth_error(e: AuthError) -> AppError {
    match e {
        AuthError::MissingField | AuthError::MissingCredentials => {
            AppError::BadRequest(e.to_string())
        }
        AuthError::UsernameTaken(_) => AppError::Conflict(e.to_string()),
        AuthError::InvalidCredentials => AppError::Auth(e.to_string()),
        AuthError::Credential(_) => AppError::Internal(e.to_string()),
        AuthError::Store(_) => AppError::Database(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn signup(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Signup request for {}", request.username);

    let account_service = AccountService::new(&state);

    // The users table is only writable with the service key.
    let account = account_service
        .signup(request, &state.supabase_key)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(json!({
        "success": true,
        "account": account,
        "message": "Account created successfully."
    })))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Login request for {}", request.username);

    let account_service = AccountService::new(&state);

    let (token, account) = account_service
        .login(request, &state.supabase_key)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "account": account,
        "message": "Login successful."
    })))
}

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    match jwt::validate_token(&token, &config.jwt_secret) {
        Ok(user) => Ok(Json(TokenResponse {
            valid: true,
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        })),
        Err(err) => Err(AppError::Auth(err)),
    }
}
