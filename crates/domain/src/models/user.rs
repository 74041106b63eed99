//! User account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user account.
///
/// A user is either an organizer or an attendee; the flags mirror the
/// account-type choice made at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    /// Pending verification code; cleared once the account is verified.
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    pub is_verified: bool,
    pub is_organizer: bool,
    pub is_attendee: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+919876543210".to_string(),
            password_hash: "secret_hash".to_string(),
            otp: Some("123456".to_string()),
            is_verified: false,
            is_organizer: false,
            is_attendee: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_user_struct() {
        let user = sample_user();
        assert_eq!(user.email, "asha@example.com");
        assert!(!user.is_verified);
        assert!(user.is_attendee);
    }

    #[test]
    fn test_secrets_not_serialized() {
        let user = sample_user();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret_hash"));
        assert!(!json.contains("123456"));
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("otp"));
    }
}
