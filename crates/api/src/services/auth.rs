//! Account registration, verification, and session management.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::models::User;
use persistence::repositories::UserRepository;
use shared::crypto::sha256_hex;
use shared::jwt::{extract_user_id, JwtConfig};
use shared::otp::{generate_otp, otp_matches};
use shared::password::{hash_password, verify_password};

use crate::error::ApiError;
use crate::middleware::metrics::record_otp_email_sent;
use crate::services::email::EmailService;

/// Issued token pair for a verified login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in_secs: i64,
}

/// Auth flows shared by the register/verify/login/logout handlers.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    email: EmailService,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, email: EmailService, jwt: JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            email,
            jwt,
        }
    }

    /// Register a new account and email its verification code.
    ///
    /// Duplicate email, username, or phone is rejected before any row is
    /// written. If the OTP email cannot be delivered the account is
    /// deleted again so the address stays free for a retry.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        phone: &str,
        password: &str,
        is_organizer: bool,
    ) -> Result<User, ApiError> {
        if let Some(field) = self.users.find_duplicate(email, username, phone).await? {
            return Err(ApiError::Conflict(format!(
                "An account with this {} already exists",
                field.as_str()
            )));
        }

        let password_hash =
            hash_password(password).map_err(|e| ApiError::Internal(e.to_string()))?;
        let otp = generate_otp();

        let user = self
            .users
            .create_user(username, email, phone, &password_hash, &otp, is_organizer)
            .await?;

        if let Err(e) = self.email.send_otp_email(email, username, &otp).await {
            error!(user_id = %user.id, error = %e, "OTP email failed, rolling back registration");
            if let Err(del) = self.users.delete_user(user.id).await {
                error!(user_id = %user.id, error = %del, "Failed to roll back registration");
            }
            return Err(ApiError::ServiceUnavailable(
                "Could not send verification email, please try again".to_string(),
            ));
        }
        record_otp_email_sent();

        info!(user_id = %user.id, "Account registered, awaiting verification");
        Ok(user.into())
    }

    /// Verify an account with the emailed code and log the user in.
    pub async fn verify_otp(
        &self,
        user_id: Uuid,
        entered: &str,
    ) -> Result<(User, TokenPair), ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("No such account".to_string()))?;

        if user.is_verified {
            return Err(ApiError::Conflict("Account is already verified".to_string()));
        }

        if !otp_matches(user.otp.as_deref(), entered) {
            warn!(user_id = %user.id, "OTP mismatch");
            return Err(ApiError::Validation("Incorrect verification code".to_string()));
        }

        self.users.mark_verified(user.id).await?;
        info!(user_id = %user.id, "Account verified");

        let tokens = self.issue_session(user.id).await?;

        let mut verified: User = user.into();
        verified.is_verified = true;
        verified.otp = None;
        Ok((verified, tokens))
    }

    /// Authenticate with email and password, issuing a token pair.
    ///
    /// Unverified accounts are refused with 403 so clients can route the
    /// user back to the OTP step.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), ApiError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

        let password_ok = verify_password(password, &user.password_hash)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        if !password_ok {
            return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
        }

        if !user.is_verified {
            return Err(ApiError::VerificationRequired { user_id: user.id });
        }

        let tokens = self.issue_session(user.id).await?;
        self.users.update_last_login(user.id, Utc::now()).await?;

        info!(user_id = %user.id, "Login succeeded");
        Ok((user.into(), tokens))
    }

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// The old session is dropped and a new one issued, so a stolen
    /// refresh token stops working after its first legitimate use.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;
        let user_id = extract_user_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;

        let session = self
            .users
            .find_session_by_refresh_token(&sha256_hex(refresh_token))
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Session has been revoked".to_string()))?;

        self.users.delete_session(session.id).await?;
        let tokens = self.issue_session(user_id).await?;

        info!(user_id = %user_id, "Session refreshed");
        Ok(tokens)
    }

    /// Drop the session behind the presented access token.
    pub async fn logout(&self, token_hash: &str) -> Result<(), ApiError> {
        self.users.delete_session_by_token(token_hash).await?;
        Ok(())
    }

    async fn issue_session(&self, user_id: Uuid) -> Result<TokenPair, ApiError> {
        let (access_token, _) = self
            .jwt
            .generate_access_token(user_id)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let (refresh_token, _) = self
            .jwt
            .generate_refresh_token(user_id)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        // Session lifetime follows the refresh token; the access-token
        // hash is what auth checks against on each request.
        let expires_at = Utc::now() + Duration::seconds(self.jwt.refresh_token_expiry_secs);
        self.users
            .create_session(
                user_id,
                &sha256_hex(&access_token),
                &sha256_hex(&refresh_token),
                expires_at,
            )
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in_secs: self.jwt.access_token_expiry_secs,
        })
    }
}
