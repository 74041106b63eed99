//! Registration, OTP verification, login, and logout handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::User;
use shared::validation::validate_phone;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Registration request payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Register as an organizer instead of an attendee.
    #[serde(default)]
    pub is_organizer: bool,
}

/// OTP verification request payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub user_id: uuid::Uuid,

    #[validate(length(min = 1, message = "Verification code is required"))]
    pub otp: String,
}

/// Login request payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub status: String,
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub status: String,
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in_secs: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in_secs: i64,
}

/// Token refresh request payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in_secs: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub status: String,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    payload.validate()?;

    let user = state
        .auth
        .register(
            &payload.username,
            &payload.email,
            &payload.phone,
            &payload.password,
            payload.is_organizer,
        )
        .await?;

    Ok(Json(RegisterResponse {
        status: "verification_pending".to_string(),
        message: "Check your email for the verification code".to_string(),
        user,
    }))
}

/// POST /api/v1/auth/verify-otp
///
/// A matching code verifies the account and logs the user straight in.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, ApiError> {
    payload.validate()?;

    let (user, tokens) = state.auth.verify_otp(payload.user_id, &payload.otp).await?;

    Ok(Json(VerifyOtpResponse {
        status: "verified".to_string(),
        user,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in_secs: tokens.expires_in_secs,
    }))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.validate()?;

    let (user, tokens) = state.auth.login(&payload.email, &payload.password).await?;

    Ok(Json(LoginResponse {
        user,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in_secs: tokens.expires_in_secs,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Rotates the session: the presented refresh token is consumed and a
/// new token pair issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    payload.validate()?;

    let tokens = state.auth.refresh(&payload.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in_secs: tokens.expires_in_secs,
    }))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<LogoutResponse>, ApiError> {
    state.auth.logout(&auth.token_hash).await?;

    Ok(Json(LogoutResponse {
        status: "logged_out".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    #[test]
    fn test_register_request_valid() {
        let req = RegisterRequest {
            username: "asha".to_string(),
            email: SafeEmail().fake(),
            phone: "9876543210".to_string(),
            password: "correct-horse".to_string(),
            is_organizer: false,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_bad_email() {
        let req = RegisterRequest {
            username: "asha".to_string(),
            email: "not-an-email".to_string(),
            phone: "9876543210".to_string(),
            password: "correct-horse".to_string(),
            is_organizer: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_bad_phone() {
        let req = RegisterRequest {
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "12ab".to_string(),
            password: "correct-horse".to_string(),
            is_organizer: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_short_password() {
        let req = RegisterRequest {
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            password: "short".to_string(),
            is_organizer: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_defaults_to_attendee() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{
                "username": "asha",
                "email": "asha@example.com",
                "phone": "9876543210",
                "password": "correct-horse"
            }"#,
        )
        .unwrap();
        assert!(!req.is_organizer);
    }

    #[test]
    fn test_refresh_request_requires_token() {
        let req = RefreshRequest {
            refresh_token: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_otp_request_requires_code() {
        let req = VerifyOtpRequest {
            user_id: uuid::Uuid::new_v4(),
            otp: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
