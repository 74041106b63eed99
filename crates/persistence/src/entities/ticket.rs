//! Ticket entity (database row mapping).

use domain::models::TicketType;
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the tickets table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_type: String,
    pub price: Decimal,
    pub available_quantity: i32,
}

impl From<TicketEntity> for domain::models::Ticket {
    fn from(entity: TicketEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            ticket_type: TicketType::from_str(&entity.ticket_type).unwrap_or(TicketType::Standard),
            price: entity.price,
            available_quantity: entity.available_quantity,
        }
    }
}
