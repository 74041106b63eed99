//! Ticket domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Ticket tier offered for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    Standard,
    Vip,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Standard => "standard",
            TicketType::Vip => "vip",
        }
    }
}

impl FromStr for TicketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(TicketType::Standard),
            "vip" => Ok(TicketType::Vip),
            _ => Err(format!("Invalid ticket type: {}", s)),
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ticket tier belonging to one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_type: TicketType,
    pub price: Decimal,
    pub available_quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_type_from_str() {
        assert_eq!(TicketType::from_str("standard").unwrap(), TicketType::Standard);
        assert_eq!(TicketType::from_str("VIP").unwrap(), TicketType::Vip);
        assert!(TicketType::from_str("premium").is_err());
    }

    #[test]
    fn test_ticket_type_display() {
        assert_eq!(format!("{}", TicketType::Vip), "vip");
        assert_eq!(format!("{}", TicketType::Standard), "standard");
    }

    #[test]
    fn test_ticket_serializes_type_lowercase() {
        let ticket = Ticket {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            ticket_type: TicketType::Vip,
            price: Decimal::from_str_exact("499.50").unwrap(),
            available_quantity: 100,
        };
        let json = serde_json::to_string(&ticket).unwrap();
        assert!(json.contains("\"ticketType\":\"vip\""));
        assert!(json.contains("499.50"));
    }
}
