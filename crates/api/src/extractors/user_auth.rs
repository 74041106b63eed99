//! User JWT authentication extractors.
//!
//! Validates the Bearer token in the Authorization header, checks the
//! backing session row still exists, and loads the account. Logout
//! deletes the session row, so revoked tokens fail here even while the
//! JWT itself is still within its expiry window.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use domain::models::User;
use persistence::repositories::UserRepository;
use shared::crypto::sha256_hex;
use shared::jwt::extract_user_id;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated user extracted from a Bearer token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user: User,
    /// Hash of the presented access token, used to drop the session on logout.
    pub token_hash: String,
}

impl UserAuth {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                ApiError::Unauthorized("Invalid Authorization header format".to_string())
            })?;

        let claims = state
            .jwt
            .validate_access_token(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;
        let user_id = extract_user_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

        let token_hash = sha256_hex(token);
        let repo = UserRepository::new(state.pool.clone());

        let session = repo.find_session_by_token(&token_hash).await?;
        if session.is_none() {
            return Err(ApiError::Unauthorized("Session has been revoked".to_string()));
        }

        let user = repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))?;

        Ok(UserAuth {
            user: user.into(),
            token_hash,
        })
    }
}

/// Authenticated organizer. Rejects non-organizer accounts with 403.
#[derive(Debug, Clone)]
pub struct OrganizerAuth(pub UserAuth);

#[async_trait]
impl FromRequestParts<AppState> for OrganizerAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state).await?;
        if !auth.user.is_organizer {
            return Err(ApiError::Forbidden(
                "Organizer account required".to_string(),
            ));
        }
        Ok(OrganizerAuth(auth))
    }
}
