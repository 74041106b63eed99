//! Booking cart entity (database row mapping).

use domain::models::{AttendeeRecord, BookingCart, TicketSelection};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the booking_carts table.
///
/// Attendee records are stored as a jsonb array; a row that predates the
/// attendee-details step holds an empty array.
#[derive(Debug, Clone, FromRow)]
pub struct CartEntity {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub standard_qty: i32,
    pub vip_qty: i32,
    pub attendees: serde_json::Value,
    pub payment_order_id: Option<String>,
    pub amount_due: Option<Decimal>,
}

impl TryFrom<CartEntity> for BookingCart {
    type Error = serde_json::Error;

    fn try_from(entity: CartEntity) -> Result<Self, Self::Error> {
        let attendees: Vec<AttendeeRecord> = serde_json::from_value(entity.attendees)?;
        Ok(Self {
            user_id: entity.user_id,
            event_id: entity.event_id,
            selection: TicketSelection {
                standard_qty: entity.standard_qty.max(0) as u32,
                vip_qty: entity.vip_qty.max(0) as u32,
            },
            attendees,
            payment_order_id: entity.payment_order_id,
            amount_due: entity.amount_due,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_entity_into_domain() {
        let entity = CartEntity {
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            standard_qty: 2,
            vip_qty: 1,
            attendees: serde_json::json!([
                {
                    "name": "Asha",
                    "email": "asha@example.com",
                    "phone": "9876543210",
                    "gender": "female",
                    "ticketType": "standard"
                }
            ]),
            payment_order_id: Some("order_9".to_string()),
            amount_due: Some(Decimal::from(750)),
        };

        let cart = BookingCart::try_from(entity).unwrap();
        assert_eq!(cart.selection.standard_qty, 2);
        assert_eq!(cart.selection.vip_qty, 1);
        assert_eq!(cart.attendees.len(), 1);
        assert_eq!(cart.attendees[0].name, "Asha");
        assert_eq!(cart.payment_order_id.as_deref(), Some("order_9"));
    }

    #[test]
    fn test_cart_entity_rejects_malformed_attendees() {
        let entity = CartEntity {
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            standard_qty: 1,
            vip_qty: 0,
            attendees: serde_json::json!({"not": "a list"}),
            payment_order_id: None,
            amount_due: None,
        };
        assert!(BookingCart::try_from(entity).is_err());
    }
}
