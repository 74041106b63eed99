//! Email service for delivering OTP verification codes.
//!
//! Supported providers:
//! - `console`: Logs emails to console (development)
//! - `sendgrid`: Uses the SendGrid API

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const SEND_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub body_text: String,
}

/// Email service for transactional mail.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Send the registration OTP email.
    ///
    /// Registration treats a failure here as fatal: the caller rolls the
    /// new account back so the user can retry with the same email.
    pub async fn send_otp_email(
        &self,
        to_email: &str,
        username: &str,
        otp: &str,
    ) -> Result<(), EmailError> {
        let subject = "Your EventHive verification code";
        let body_text = format!(
            r#"Hi {username},

Your EventHive verification code is: {otp}

Enter this code to verify your account and start booking events.

If you didn't create an account with EventHive, you can safely ignore this email.

The EventHive Team"#,
        );

        let message = EmailMessage {
            to: to_email.to_string(),
            to_name: Some(username.to_string()),
            subject: subject.to_string(),
            body_text,
        };

        self.send(message).await
    }

    /// Send an email message via the configured provider.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message),
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body_text,
            "Console email (not actually sent)"
        );
        Ok(())
    }

    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let payload = json!({
            "personalizations": [{
                "to": [{
                    "email": message.to,
                    "name": message.to_name,
                }],
            }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name,
            },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body_text,
            }],
        });

        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "SendGrid rejected email");
            return Err(EmailError::ProviderError(format!(
                "SendGrid returned {}",
                status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_service_skips_send() {
        let service = EmailService::new(EmailConfig::default());
        let result = service
            .send_otp_email("user@example.com", "user", "123456")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_provider_fails() {
        let config = EmailConfig {
            enabled: true,
            provider: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        let service = EmailService::new(config);
        let result = service
            .send_otp_email("user@example.com", "user", "123456")
            .await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_sendgrid_without_key_not_configured() {
        let config = EmailConfig {
            enabled: true,
            provider: "sendgrid".to_string(),
            ..Default::default()
        };
        let service = EmailService::new(config);
        let result = service
            .send_otp_email("user@example.com", "user", "123456")
            .await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }
}
