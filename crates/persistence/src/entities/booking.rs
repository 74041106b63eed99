//! Booking and attendee entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{Gender, PaymentStatus, TicketType};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the bookings table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub ticket_id: Uuid,
    pub quantity: i32,
    pub attendee_name: String,
    pub attendee_email: String,
    pub attendee_phone: String,
    pub payment_status: String,
    pub payment_id: Option<String>,
    pub amount_paid: Decimal,
    pub booked_at: DateTime<Utc>,
}

impl From<BookingEntity> for domain::models::Booking {
    fn from(entity: BookingEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            event_id: entity.event_id,
            ticket_id: entity.ticket_id,
            quantity: entity.quantity,
            attendee_name: entity.attendee_name,
            attendee_email: entity.attendee_email,
            attendee_phone: entity.attendee_phone,
            payment_status: PaymentStatus::from_str(&entity.payment_status)
                .unwrap_or(PaymentStatus::Pending),
            payment_id: entity.payment_id,
            amount_paid: entity.amount_paid,
            booked_at: entity.booked_at,
        }
    }
}

/// Database row mapping for the attendees table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendeeEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
}

impl From<AttendeeEntity> for domain::models::Attendee {
    fn from(entity: AttendeeEntity) -> Self {
        Self {
            id: entity.id,
            booking_id: entity.booking_id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            gender: Gender::from_str(&entity.gender).unwrap_or(Gender::Other),
        }
    }
}

/// Booking row joined with its ticket tier and event title.
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    #[sqlx(flatten)]
    pub booking: BookingEntity,
    pub ticket_type: String,
    pub event_title: String,
}

impl From<BookingRow> for domain::models::BookingSummary {
    fn from(row: BookingRow) -> Self {
        Self {
            ticket_type: TicketType::from_str(&row.ticket_type).unwrap_or(TicketType::Standard),
            event_title: row.event_title,
            booking: row.booking.into(),
        }
    }
}
