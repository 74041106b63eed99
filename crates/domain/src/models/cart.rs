//! The booking cart: a user's in-progress booking attempt for one event.
//!
//! The cart moves through three steps: ticket quantities are selected,
//! attendee details are entered (one record per seat), then a payment
//! order is bound to it. Confirmation consumes the cart entirely.

use crate::models::booking::Gender;
use crate::models::ticket::TicketType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while mutating a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Please select at least one ticket")]
    NoTicketsSelected,

    #[error("Expected {expected} attendee records, got {got}")]
    AttendeeCountMismatch { expected: u32, got: u32 },

    #[error("Expected {expected} {ticket_type} attendees, got {got}")]
    TypeCountMismatch {
        ticket_type: TicketType,
        expected: u32,
        got: u32,
    },

    #[error("Attendee {index}: {field} must not be empty")]
    EmptyAttendeeField { index: usize, field: &'static str },

    #[error("Invalid booking flow")]
    IncompleteFlow,
}

/// Ticket quantities chosen on the selection step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSelection {
    pub standard_qty: u32,
    pub vip_qty: u32,
}

impl TicketSelection {
    pub fn total(&self) -> u32 {
        self.standard_qty + self.vip_qty
    }
}

/// One attendee as entered on the details step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: Gender,
    pub ticket_type: TicketType,
}

/// Server-side cart state for one (user, event) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCart {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub selection: TicketSelection,
    pub attendees: Vec<AttendeeRecord>,
    /// Gateway order identifier once a payment order has been opened.
    pub payment_order_id: Option<String>,
    /// Total computed when the payment order was opened.
    pub amount_due: Option<Decimal>,
}

impl BookingCart {
    /// Starts a cart from a ticket selection.
    ///
    /// Rejects an empty selection. Any previously entered attendees or
    /// bound payment order are discarded: re-selecting restarts the flow.
    pub fn select(
        user_id: Uuid,
        event_id: Uuid,
        selection: TicketSelection,
    ) -> Result<Self, CartError> {
        if selection.total() == 0 {
            return Err(CartError::NoTicketsSelected);
        }
        Ok(Self {
            user_id,
            event_id,
            selection,
            attendees: Vec::new(),
            payment_order_id: None,
            amount_due: None,
        })
    }

    /// Stores attendee details, one record per seat.
    ///
    /// The list must match the selection exactly: total count, per-type
    /// counts, and no empty contact fields.
    pub fn set_attendees(&mut self, attendees: Vec<AttendeeRecord>) -> Result<(), CartError> {
        let expected = self.selection.total();
        let got = attendees.len() as u32;
        if got != expected {
            return Err(CartError::AttendeeCountMismatch { expected, got });
        }

        for (ticket_type, expected) in [
            (TicketType::Standard, self.selection.standard_qty),
            (TicketType::Vip, self.selection.vip_qty),
        ] {
            let got = attendees
                .iter()
                .filter(|a| a.ticket_type == ticket_type)
                .count() as u32;
            if got != expected {
                return Err(CartError::TypeCountMismatch {
                    ticket_type,
                    expected,
                    got,
                });
            }
        }

        for (index, attendee) in attendees.iter().enumerate() {
            for (field, value) in [
                ("name", &attendee.name),
                ("email", &attendee.email),
                ("phone", &attendee.phone),
            ] {
                if value.trim().is_empty() {
                    return Err(CartError::EmptyAttendeeField { index, field });
                }
            }
        }

        self.attendees = attendees;
        // Entering new attendees invalidates any previously opened order
        self.payment_order_id = None;
        self.amount_due = None;
        Ok(())
    }

    /// Binds a created payment order to the cart.
    ///
    /// Fails unless quantities and attendees have both been captured.
    pub fn bind_order(&mut self, order_id: String, amount: Decimal) -> Result<(), CartError> {
        if self.attendees.is_empty() {
            return Err(CartError::IncompleteFlow);
        }
        self.payment_order_id = Some(order_id);
        self.amount_due = Some(amount);
        Ok(())
    }

    /// True once the cart holds quantities and a full attendee list.
    pub fn ready_for_payment(&self) -> bool {
        self.selection.total() > 0 && !self.attendees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn attendee(ticket_type: TicketType) -> AttendeeRecord {
        AttendeeRecord {
            name: Name().fake(),
            email: SafeEmail().fake(),
            phone: "9876543210".to_string(),
            gender: Gender::Other,
            ticket_type,
        }
    }

    fn cart_with(standard: u32, vip: u32) -> BookingCart {
        BookingCart::select(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TicketSelection {
                standard_qty: standard,
                vip_qty: vip,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_select_rejects_zero_tickets() {
        let result = BookingCart::select(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TicketSelection {
                standard_qty: 0,
                vip_qty: 0,
            },
        );
        assert_eq!(result.unwrap_err(), CartError::NoTicketsSelected);
    }

    #[test]
    fn test_select_accepts_single_type() {
        let cart = cart_with(2, 0);
        assert_eq!(cart.selection.total(), 2);
        assert!(cart.attendees.is_empty());
        assert!(!cart.ready_for_payment());
    }

    #[test]
    fn test_set_attendees_happy_path() {
        let mut cart = cart_with(1, 1);
        cart.set_attendees(vec![
            attendee(TicketType::Standard),
            attendee(TicketType::Vip),
        ])
        .unwrap();
        assert!(cart.ready_for_payment());
    }

    #[test]
    fn test_set_attendees_count_mismatch() {
        let mut cart = cart_with(2, 0);
        let err = cart
            .set_attendees(vec![attendee(TicketType::Standard)])
            .unwrap_err();
        assert_eq!(
            err,
            CartError::AttendeeCountMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_set_attendees_type_mismatch() {
        let mut cart = cart_with(1, 1);
        let err = cart
            .set_attendees(vec![
                attendee(TicketType::Standard),
                attendee(TicketType::Standard),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            CartError::TypeCountMismatch {
                ticket_type: TicketType::Standard,
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn test_set_attendees_empty_field() {
        let mut cart = cart_with(1, 0);
        let mut record = attendee(TicketType::Standard);
        record.phone = "  ".to_string();
        let err = cart.set_attendees(vec![record]).unwrap_err();
        assert_eq!(
            err,
            CartError::EmptyAttendeeField {
                index: 0,
                field: "phone"
            }
        );
    }

    #[test]
    fn test_set_attendees_invalidates_bound_order() {
        let mut cart = cart_with(1, 0);
        cart.set_attendees(vec![attendee(TicketType::Standard)])
            .unwrap();
        cart.bind_order("order_1".to_string(), Decimal::from(100))
            .unwrap();

        cart.set_attendees(vec![attendee(TicketType::Standard)])
            .unwrap();
        assert_eq!(cart.payment_order_id, None);
        assert_eq!(cart.amount_due, None);
    }

    #[test]
    fn test_bind_order_requires_attendees() {
        let mut cart = cart_with(1, 0);
        let err = cart
            .bind_order("order_1".to_string(), Decimal::from(100))
            .unwrap_err();
        assert_eq!(err, CartError::IncompleteFlow);
    }

    #[test]
    fn test_bind_order_stores_amount() {
        let mut cart = cart_with(1, 0);
        cart.set_attendees(vec![attendee(TicketType::Standard)])
            .unwrap();
        cart.bind_order("order_42".to_string(), Decimal::from_str_exact("250.00").unwrap())
            .unwrap();
        assert_eq!(cart.payment_order_id.as_deref(), Some("order_42"));
        assert_eq!(cart.amount_due, Some(Decimal::from_str_exact("250.00").unwrap()));
    }
}
