//! Payment gateway integration.
//!
//! Orders are created against a Razorpay-compatible REST API with basic
//! auth and immediate capture. Callback signatures are verified with
//! HMAC-SHA256 over `"{order_id}|{payment_id}"` when a webhook secret is
//! configured.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::PaymentConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur during payment gateway operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Gateway request failed: {0}")]
    RequestFailed(String),

    #[error("Gateway returned {status}: {body}")]
    GatewayRejected { status: u16, body: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A payment order created at the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    /// Amount in minor currency units (e.g. paise).
    pub amount: i64,
    pub currency: String,
}

/// Gateway seam, mocked in handler tests.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for the given amount in major currency units.
    async fn create_order(
        &self,
        amount: Decimal,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError>;

    /// Verify a callback signature. Returns true when no webhook secret
    /// is configured.
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

/// Razorpay-compatible REST gateway client.
pub struct RestPaymentGateway {
    config: PaymentConfig,
    client: reqwest::Client,
}

impl RestPaymentGateway {
    pub fn new(config: PaymentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }
}

/// Converts a major-unit amount to minor units (x100), rejecting
/// amounts that are negative or lose precision.
fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    if amount.is_sign_negative() {
        return Err(PaymentError::InvalidAmount(amount.to_string()));
    }
    (amount * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| PaymentError::InvalidAmount(amount.to_string()))
}

#[async_trait]
impl PaymentGateway for RestPaymentGateway {
    async fn create_order(
        &self,
        amount: Decimal,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError> {
        let amount_minor = to_minor_units(amount)?;

        let payload = json!({
            "amount": amount_minor,
            "currency": self.config.currency,
            "receipt": receipt,
            "payment_capture": 1,
        });

        let response = self
            .client
            .post(format!("{}/orders", self.config.base_url))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&payload)
            .send()
            .await
            .map_err(|e| PaymentError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status = status, body = %body, "Payment gateway rejected order");
            return Err(PaymentError::GatewayRejected { status, body });
        }

        let order: PaymentOrder = response
            .json()
            .await
            .map_err(|e| PaymentError::RequestFailed(e.to_string()))?;

        info!(order_id = %order.id, amount = amount_minor, "Payment order created");
        Ok(order)
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        if self.config.webhook_secret.is_empty() {
            return true;
        }

        let mut mac = match HmacSha256::new_from_slice(self.config.webhook_secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        expected == signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn test_config(webhook_secret: &str) -> PaymentConfig {
        PaymentConfig {
            base_url: "https://gateway.test/v1".to_string(),
            key_id: "key".to_string(),
            key_secret: "secret".to_string(),
            currency: "INR".to_string(),
            webhook_secret: webhook_secret.to_string(),
            timeout_ms: 1000,
        }
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(
            to_minor_units(Decimal::from_str_exact("250.00").unwrap()).unwrap(),
            25000
        );
        assert_eq!(
            to_minor_units(Decimal::from_str_exact("0.50").unwrap()).unwrap(),
            50
        );
        assert!(to_minor_units(Decimal::from_str_exact("-1.00").unwrap()).is_err());
    }

    #[test]
    fn test_verify_signature_no_secret_accepts() {
        let gateway = RestPaymentGateway::new(test_config(""));
        assert!(gateway.verify_signature("order_1", "pay_1", "anything"));
    }

    #[test]
    fn test_verify_signature_roundtrip() {
        let gateway = RestPaymentGateway::new(test_config("topsecret"));

        let mut mac = HmacSha256::new_from_slice(b"topsecret").unwrap();
        mac.update(b"order_1|pay_1");
        let signature = hex::encode(mac.finalize().into_bytes());

        assert!(gateway.verify_signature("order_1", "pay_1", &signature));
        assert!(!gateway.verify_signature("order_1", "pay_2", &signature));
        assert!(!gateway.verify_signature("order_1", "pay_1", "deadbeef"));
    }
}
