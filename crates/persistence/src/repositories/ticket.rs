//! Ticket repository for database operations.

use domain::models::TicketType;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TicketEntity;
use crate::metrics::QueryTimer;

/// Repository for ticket tiers.
#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    /// Creates a new TicketRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List ticket tiers for an event, standard before vip.
    pub async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_tickets_by_event");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            SELECT id, event_id, ticket_type, price, available_quantity
            FROM tickets
            WHERE event_id = $1
            ORDER BY ticket_type
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a tier by event and type.
    pub async fn find_by_event_and_type(
        &self,
        event_id: Uuid,
        ticket_type: TicketType,
    ) -> Result<Option<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ticket_by_event_and_type");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            SELECT id, event_id, ticket_type, price, available_quantity
            FROM tickets
            WHERE event_id = $1 AND ticket_type = $2
            "#,
        )
        .bind(event_id)
        .bind(ticket_type.as_str())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a ticket tier for an event. The unique index on
    /// (event_id, ticket_type) rejects a second tier of the same type.
    pub async fn create(
        &self,
        event_id: Uuid,
        ticket_type: TicketType,
        price: Decimal,
        available_quantity: i32,
    ) -> Result<TicketEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_ticket");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            INSERT INTO tickets (event_id, ticket_type, price, available_quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_id, ticket_type, price, available_quantity
            "#,
        )
        .bind(event_id)
        .bind(ticket_type.as_str())
        .bind(price)
        .bind(available_quantity)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a tier's price and remaining quantity, scoped to its event.
    pub async fn update(
        &self,
        id: Uuid,
        event_id: Uuid,
        price: Decimal,
        available_quantity: i32,
    ) -> Result<Option<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_ticket");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            UPDATE tickets
            SET price = $3, available_quantity = $4
            WHERE id = $1 AND event_id = $2
            RETURNING id, event_id, ticket_type, price, available_quantity
            "#,
        )
        .bind(id)
        .bind(event_id)
        .bind(price)
        .bind(available_quantity)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a tier, scoped to its event. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid, event_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_ticket");
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
