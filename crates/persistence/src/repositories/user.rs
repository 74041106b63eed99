//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{UserEntity, UserSessionEntity};
use crate::metrics::QueryTimer;

/// Which unique field an intended registration collides on.
///
/// Checked in the same order the registration form reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Username,
    Phone,
}

impl DuplicateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateField::Email => "email",
            DuplicateField::Username => "username",
            DuplicateField::Phone => "phone",
        }
    }
}

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email, phone, password_hash, otp, is_verified,
                   is_organizer, is_attendee, created_at, updated_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email, phone, password_hash, otp, is_verified,
                   is_organizer, is_attendee, created_at, updated_at, last_login_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Checks whether a registration would collide on email, username, or
    /// phone, before any row is written.
    pub async fn find_duplicate(
        &self,
        email: &str,
        username: &str,
        phone: &str,
    ) -> Result<Option<DuplicateField>, sqlx::Error> {
        let timer = QueryTimer::new("find_duplicate_user");
        let row: (bool, bool, bool) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1),
                   EXISTS(SELECT 1 FROM users WHERE username = $2),
                   EXISTS(SELECT 1 FROM users WHERE phone = $3)
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(match row {
            (true, _, _) => Some(DuplicateField::Email),
            (_, true, _) => Some(DuplicateField::Username),
            (_, _, true) => Some(DuplicateField::Phone),
            _ => None,
        })
    }

    /// Create a new unverified user with a pending OTP.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        phone: &str,
        password_hash: &str,
        otp: &str,
        is_organizer: bool,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (username, email, phone, password_hash, otp,
                               is_verified, is_organizer, is_attendee)
            VALUES ($1, $2, $3, $4, $5, false, $6, $7)
            RETURNING id, username, email, phone, password_hash, otp, is_verified,
                      is_organizer, is_attendee, created_at, updated_at, last_login_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(phone)
        .bind(password_hash)
        .bind(otp)
        .bind(is_organizer)
        .bind(!is_organizer)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a user account (registration rollback when the OTP email
    /// cannot be delivered).
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }

    /// Mark a user verified and clear the pending OTP.
    pub async fn mark_verified(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_user_verified");
        sqlx::query(
            r#"
            UPDATE users
            SET is_verified = true, otp = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Update user's last login timestamp.
    pub async fn update_last_login(
        &self,
        user_id: Uuid,
        last_login_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_user_last_login");
        sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(last_login_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Create a new user session.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        refresh_token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<UserSessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user_session");
        let result = sqlx::query_as::<_, UserSessionEntity>(
            r#"
            INSERT INTO user_sessions (user_id, token_hash, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token_hash, refresh_token_hash, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(refresh_token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an unexpired session by token hash.
    pub async fn find_session_by_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<UserSessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_by_token");
        let result = sqlx::query_as::<_, UserSessionEntity>(
            r#"
            SELECT id, user_id, token_hash, refresh_token_hash, expires_at, created_at
            FROM user_sessions
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an unexpired session by refresh-token hash.
    pub async fn find_session_by_refresh_token(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<UserSessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_by_refresh_token");
        let result = sqlx::query_as::<_, UserSessionEntity>(
            r#"
            SELECT id, user_id, token_hash, refresh_token_hash, expires_at, created_at
            FROM user_sessions
            WHERE refresh_token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(refresh_token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a session by id (refresh rotation).
    pub async fn delete_session(&self, session_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("delete_session");
        sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }

    /// Delete a session by token hash (logout).
    pub async fn delete_session_by_token(&self, token_hash: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("delete_session_by_token");
        sqlx::query("DELETE FROM user_sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_as_str() {
        assert_eq!(DuplicateField::Email.as_str(), "email");
        assert_eq!(DuplicateField::Username.as_str(), "username");
        assert_eq!(DuplicateField::Phone.as_str(), "phone");
    }

    // Note: UserRepository query methods require a database connection and
    // are covered by integration environments.
}
