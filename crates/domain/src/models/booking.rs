//! Booking and attendee domain models.

use crate::models::ticket::TicketType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Payment state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attendee gender as collected on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A confirmed (or pending) reservation of one ticket seat.
///
/// The payment-confirmed flow creates one booking per seat with quantity 1
/// and `amount_paid` equal to that seat's ticket price at confirmation time.
/// Free-entry seats record an `amount_paid` of 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub ticket_id: Uuid,
    pub quantity: i32,
    pub attendee_name: String,
    pub attendee_email: String,
    pub attendee_phone: String,
    pub payment_status: PaymentStatus,
    /// External payment identifier from the gateway.
    pub payment_id: Option<String>,
    pub amount_paid: Decimal,
    pub booked_at: DateTime<Utc>,
}

/// Per-seat identity record attached to a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: Gender,
}

/// A booking together with its ticket tier, for organizer listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub booking: Booking,
    pub ticket_type: TicketType,
    pub event_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Cancelled,
        ] {
            assert_eq!(PaymentStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(PaymentStatus::from_str("refunded").is_err());
    }

    #[test]
    fn test_gender_from_str_case_insensitive() {
        assert_eq!(Gender::from_str("Male").unwrap(), Gender::Male);
        assert_eq!(Gender::from_str("FEMALE").unwrap(), Gender::Female);
        assert_eq!(Gender::from_str("other").unwrap(), Gender::Other);
        assert!(Gender::from_str("unknown").is_err());
    }

    #[test]
    fn test_booking_serializes_status_lowercase() {
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            ticket_id: Uuid::new_v4(),
            quantity: 1,
            attendee_name: "Ravi".to_string(),
            attendee_email: "ravi@example.com".to_string(),
            attendee_phone: "9876543210".to_string(),
            payment_status: PaymentStatus::Paid,
            payment_id: Some("pay_123".to_string()),
            amount_paid: Decimal::from_str_exact("250.00").unwrap(),
            booked_at: Utc::now(),
        };
        let json = serde_json::to_string(&booking).unwrap();
        assert!(json.contains("\"paymentStatus\":\"paid\""));
        assert!(json.contains("\"paymentId\":\"pay_123\""));
    }
}
