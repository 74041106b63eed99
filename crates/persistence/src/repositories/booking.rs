//! Booking repository for database operations.

use domain::models::{BookingCart, TicketType};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::entities::{AttendeeEntity, BookingRow};
use crate::metrics::QueryTimer;

/// Failure modes of booking confirmation. All of them roll the
/// transaction back; nothing is booked unless every seat is.
#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    #[error("event has no {0} ticket tier")]
    TierUnavailable(TicketType),
    #[error("not enough {0} tickets remaining")]
    InsufficientInventory(TicketType),
    #[error("cart is not ready for confirmation")]
    CartNotReady,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for confirmed bookings and their attendee rosters.
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Creates a new BookingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Turn a paid cart into confirmed bookings, one per attendee, inside
    /// a single transaction. Inventory is decremented with a guard so two
    /// concurrent confirmations can never oversell a tier; if any seat
    /// cannot be granted the whole confirmation fails. The cart row is
    /// removed on success, which makes a replayed gateway callback a
    /// no-op at the caller.
    pub async fn confirm_paid_booking(
        &self,
        cart: &BookingCart,
        payment_id: &str,
    ) -> Result<Vec<Uuid>, ConfirmError> {
        self.confirm(cart, payment_id, false).await
    }

    /// Turn a free cart into confirmed bookings. Same transaction and
    /// inventory rules as a paid confirmation, but every seat records
    /// `amount_paid` 0 regardless of tier price, so no-charge entries
    /// never count as revenue.
    pub async fn confirm_free_booking(
        &self,
        cart: &BookingCart,
        payment_id: &str,
    ) -> Result<Vec<Uuid>, ConfirmError> {
        self.confirm(cart, payment_id, true).await
    }

    async fn confirm(
        &self,
        cart: &BookingCart,
        payment_id: &str,
        complimentary: bool,
    ) -> Result<Vec<Uuid>, ConfirmError> {
        if !cart.ready_for_payment() {
            return Err(ConfirmError::CartNotReady);
        }

        let timer = QueryTimer::new("confirm_booking");
        let mut tx = self.pool.begin().await?;

        let mut tier_ids = Vec::new();
        for (ticket_type, qty) in [
            (TicketType::Standard, cart.selection.standard_qty),
            (TicketType::Vip, cart.selection.vip_qty),
        ] {
            if qty == 0 {
                continue;
            }
            let tier = reserve_tier(&mut tx, cart.event_id, ticket_type, qty).await?;
            tier_ids.push((ticket_type, tier));
        }

        let mut booking_ids = Vec::with_capacity(cart.attendees.len());
        for attendee in &cart.attendees {
            let (_, (ticket_id, price)) = tier_ids
                .iter()
                .find(|(t, _)| *t == attendee.ticket_type)
                .ok_or(ConfirmError::TierUnavailable(attendee.ticket_type))?;

            let booking_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO bookings (user_id, event_id, ticket_id, quantity,
                                      attendee_name, attendee_email, attendee_phone,
                                      payment_status, payment_id, amount_paid)
                VALUES ($1, $2, $3, 1, $4, $5, $6, 'paid', $7, $8)
                RETURNING id
                "#,
            )
            .bind(cart.user_id)
            .bind(cart.event_id)
            .bind(ticket_id)
            .bind(&attendee.name)
            .bind(&attendee.email)
            .bind(&attendee.phone)
            .bind(payment_id)
            .bind(seat_amount(*price, complimentary))
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO attendees (booking_id, name, email, phone, gender)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(booking_id)
            .bind(&attendee.name)
            .bind(&attendee.email)
            .bind(&attendee.phone)
            .bind(attendee.gender.as_str())
            .execute(&mut *tx)
            .await?;

            booking_ids.push(booking_id);
        }

        sqlx::query("DELETE FROM booking_carts WHERE user_id = $1 AND event_id = $2")
            .bind(cart.user_id)
            .bind(cart.event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(booking_ids)
    }

    /// List a user's bookings with tier and event title, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<BookingRow>, sqlx::Error> {
        let timer = QueryTimer::new("list_bookings_for_user");
        let result = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.id, b.user_id, b.event_id, b.ticket_id, b.quantity,
                   b.attendee_name, b.attendee_email, b.attendee_phone,
                   b.payment_status, b.payment_id, b.amount_paid, b.booked_at,
                   t.ticket_type, e.title AS event_title
            FROM bookings b
            JOIN tickets t ON t.id = b.ticket_id
            JOIN events e ON e.id = b.event_id
            WHERE b.user_id = $1
            ORDER BY b.booked_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List bookings for an event, scoped to its organizer.
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
        organizer_email: &str,
    ) -> Result<Vec<BookingRow>, sqlx::Error> {
        let timer = QueryTimer::new("list_bookings_for_event");
        let result = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.id, b.user_id, b.event_id, b.ticket_id, b.quantity,
                   b.attendee_name, b.attendee_email, b.attendee_phone,
                   b.payment_status, b.payment_id, b.amount_paid, b.booked_at,
                   t.ticket_type, e.title AS event_title
            FROM bookings b
            JOIN tickets t ON t.id = b.ticket_id
            JOIN events e ON e.id = b.event_id
            WHERE b.event_id = $1 AND e.organizer_email = $2
            ORDER BY b.booked_at DESC
            "#,
        )
        .bind(event_id)
        .bind(organizer_email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the attendee roster for an event, scoped to its organizer.
    /// Filters are conjunctive; `gender = "all"` and a blank search are
    /// treated as absent.
    pub async fn list_attendees_for_event(
        &self,
        event_id: Uuid,
        organizer_email: &str,
        gender: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<AttendeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_attendees_for_event");

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT a.id, a.booking_id, a.name, a.email, a.phone, a.gender
            FROM attendees a
            JOIN bookings b ON b.id = a.booking_id
            JOIN events e ON e.id = b.event_id
            WHERE b.event_id = "#,
        );
        qb.push_bind(event_id);
        qb.push(" AND e.organizer_email = ");
        qb.push_bind(organizer_email.to_string());

        if let Some(gender) = gender
            .map(str::trim)
            .filter(|g| !g.is_empty() && !g.eq_ignore_ascii_case("all"))
        {
            qb.push(" AND a.gender = ");
            qb.push_bind(gender.to_lowercase());
        }

        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            qb.push(" AND (a.name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR a.email ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR a.phone ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        qb.push(" ORDER BY a.name");

        let result = qb
            .build_query_as::<AttendeeEntity>()
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find one booking with tier and event title, scoped to its organizer.
    pub async fn find_for_organizer(
        &self,
        booking_id: Uuid,
        organizer_email: &str,
    ) -> Result<Option<BookingRow>, sqlx::Error> {
        let timer = QueryTimer::new("find_booking_for_organizer");
        let result = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.id, b.user_id, b.event_id, b.ticket_id, b.quantity,
                   b.attendee_name, b.attendee_email, b.attendee_phone,
                   b.payment_status, b.payment_id, b.amount_paid, b.booked_at,
                   t.ticket_type, e.title AS event_title
            FROM bookings b
            JOIN tickets t ON t.id = b.ticket_id
            JOIN events e ON e.id = b.event_id
            WHERE b.id = $1 AND e.organizer_email = $2
            "#,
        )
        .bind(booking_id)
        .bind(organizer_email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List attendee rows attached to one booking.
    pub async fn list_attendees_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<AttendeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_attendees_for_booking");
        let result = sqlx::query_as::<_, AttendeeEntity>(
            r#"
            SELECT id, booking_id, name, email, phone, gender
            FROM attendees
            WHERE booking_id = $1
            ORDER BY name
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

/// What one seat records as `amount_paid`. Complimentary seats are
/// worth 0 whatever the tier price says.
fn seat_amount(price: Decimal, complimentary: bool) -> Decimal {
    if complimentary {
        Decimal::ZERO
    } else {
        price
    }
}

/// Locks a tier row and decrements its inventory, failing when the tier
/// is missing or fewer than `qty` seats remain.
async fn reserve_tier(
    tx: &mut Transaction<'_, Postgres>,
    event_id: Uuid,
    ticket_type: TicketType,
    qty: u32,
) -> Result<(Uuid, Decimal), ConfirmError> {
    let tier: Option<(Uuid, Decimal)> = sqlx::query_as(
        r#"
        SELECT id, price
        FROM tickets
        WHERE event_id = $1 AND ticket_type = $2
        FOR UPDATE
        "#,
    )
    .bind(event_id)
    .bind(ticket_type.as_str())
    .fetch_optional(&mut **tx)
    .await?;

    let (ticket_id, price) = tier.ok_or(ConfirmError::TierUnavailable(ticket_type))?;

    let updated = sqlx::query(
        r#"
        UPDATE tickets
        SET available_quantity = available_quantity - $2
        WHERE id = $1 AND available_quantity >= $2
        "#,
    )
    .bind(ticket_id)
    .bind(qty as i32)
    .execute(&mut **tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ConfirmError::InsufficientInventory(ticket_type));
    }

    Ok((ticket_id, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::TicketSelection;

    // Quantities selected but no attendee details yet, so the cart has
    // not finished the flow.
    fn unready_cart() -> BookingCart {
        BookingCart {
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            selection: TicketSelection {
                standard_qty: 1,
                vip_qty: 0,
            },
            attendees: Vec::new(),
            payment_order_id: None,
            amount_due: None,
        }
    }

    #[tokio::test]
    async fn test_confirm_rejects_unready_cart() {
        let cart = unready_cart();
        assert!(!cart.ready_for_payment());

        // The guard fires before any query, so the lazy pool is never hit.
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let repo = BookingRepository::new(pool);
        let err = repo.confirm_paid_booking(&cart, "pay_1").await.unwrap_err();
        assert!(matches!(err, ConfirmError::CartNotReady));
    }

    #[tokio::test]
    async fn test_free_confirm_rejects_unready_cart() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let repo = BookingRepository::new(pool);
        let err = repo
            .confirm_free_booking(&unready_cart(), "free_entry")
            .await
            .unwrap_err();
        assert!(matches!(err, ConfirmError::CartNotReady));
    }

    #[test]
    fn test_complimentary_seats_record_zero_amount() {
        let price = Decimal::from_str_exact("499.50").unwrap();
        assert_eq!(seat_amount(price, true), Decimal::ZERO);
        assert_eq!(seat_amount(price, false), price);
    }

    #[test]
    fn test_confirm_error_messages() {
        let err = ConfirmError::InsufficientInventory(TicketType::Vip);
        assert_eq!(err.to_string(), "not enough vip tickets remaining");
        let err = ConfirmError::TierUnavailable(TicketType::Standard);
        assert_eq!(err.to_string(), "event has no standard ticket tier");
    }
}
