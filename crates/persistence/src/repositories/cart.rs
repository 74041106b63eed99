//! Booking cart repository for database operations.

use domain::models::AttendeeRecord;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CartEntity;
use crate::metrics::QueryTimer;

/// Repository for in-progress booking carts.
///
/// One cart exists per (user, event); re-selecting tickets replaces the
/// whole row so stale attendee details or payment orders never survive
/// a restart of the flow.
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Creates a new CartRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user's cart for an event.
    pub async fn find(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<CartEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_cart");
        let result = sqlx::query_as::<_, CartEntity>(
            r#"
            SELECT user_id, event_id, standard_qty, vip_qty, attendees,
                   payment_order_id, amount_due
            FROM booking_carts
            WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a cart by its bound payment order id (callback resolution).
    pub async fn find_by_order_id(
        &self,
        payment_order_id: &str,
    ) -> Result<Option<CartEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_cart_by_order_id");
        let result = sqlx::query_as::<_, CartEntity>(
            r#"
            SELECT user_id, event_id, standard_qty, vip_qty, attendees,
                   payment_order_id, amount_due
            FROM booking_carts
            WHERE payment_order_id = $1
            "#,
        )
        .bind(payment_order_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace the cart with a fresh ticket selection. Attendee details
    /// and any bound payment order are discarded.
    pub async fn upsert_selection(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        standard_qty: u32,
        vip_qty: u32,
    ) -> Result<CartEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_cart_selection");
        let result = sqlx::query_as::<_, CartEntity>(
            r#"
            INSERT INTO booking_carts (user_id, event_id, standard_qty, vip_qty)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, event_id) DO UPDATE
            SET standard_qty = EXCLUDED.standard_qty,
                vip_qty = EXCLUDED.vip_qty,
                attendees = '[]'::jsonb,
                payment_order_id = NULL,
                amount_due = NULL,
                updated_at = NOW()
            RETURNING user_id, event_id, standard_qty, vip_qty, attendees,
                      payment_order_id, amount_due
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(standard_qty as i32)
        .bind(vip_qty as i32)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Store validated attendee details on the cart. A previously bound
    /// payment order is invalidated.
    pub async fn set_attendees(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        attendees: &[AttendeeRecord],
    ) -> Result<Option<CartEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_cart_attendees");
        let attendees_json = attendees_to_json(attendees)?;
        let result = sqlx::query_as::<_, CartEntity>(
            r#"
            UPDATE booking_carts
            SET attendees = $3, payment_order_id = NULL, amount_due = NULL,
                updated_at = NOW()
            WHERE user_id = $1 AND event_id = $2
            RETURNING user_id, event_id, standard_qty, vip_qty, attendees,
                      payment_order_id, amount_due
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(attendees_json)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Bind a gateway payment order to the cart.
    pub async fn bind_order(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        payment_order_id: &str,
        amount_due: Decimal,
    ) -> Result<Option<CartEntity>, sqlx::Error> {
        let timer = QueryTimer::new("bind_cart_order");
        let result = sqlx::query_as::<_, CartEntity>(
            r#"
            UPDATE booking_carts
            SET payment_order_id = $3, amount_due = $4, updated_at = NOW()
            WHERE user_id = $1 AND event_id = $2
            RETURNING user_id, event_id, standard_qty, vip_qty, attendees,
                      payment_order_id, amount_due
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(payment_order_id)
        .bind(amount_due)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a user's cart for an event (flow restart).
    pub async fn delete(&self, user_id: Uuid, event_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("delete_cart");
        sqlx::query("DELETE FROM booking_carts WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }
}

/// Serializes attendee records into the jsonb column shape.
fn attendees_to_json(attendees: &[AttendeeRecord]) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(attendees).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{Gender, TicketType};

    #[test]
    fn test_attendees_serialize_to_jsonb_shape() {
        let attendees = vec![AttendeeRecord {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone: "9876543210".to_string(),
            gender: Gender::Male,
            ticket_type: TicketType::Standard,
        }];

        let value = attendees_to_json(&attendees).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["ticketType"], "standard");
        assert_eq!(value[0]["gender"], "male");
    }
}
