//! Organizer dashboard aggregation queries.

use chrono::Utc;
use domain::models::{EventCounts, OrganizerDashboard};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::metrics::QueryTimer;

/// Repository for the organizer dashboard rollup.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Aggregate event counts, seats sold, and revenue for one organizer.
    /// Only paid bookings count toward seats and revenue.
    pub async fn summarize(
        &self,
        organizer_email: &str,
    ) -> Result<OrganizerDashboard, sqlx::Error> {
        let timer = QueryTimer::new("organizer_dashboard");

        let counts: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'published'),
                   COUNT(*) FILTER (WHERE status = 'draft'),
                   COUNT(*) FILTER (WHERE status = 'archived')
            FROM events
            WHERE organizer_email = $1
            "#,
        )
        .bind(organizer_email)
        .fetch_one(&self.pool)
        .await?;

        let (tickets_booked, revenue): (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(b.quantity), 0),
                   COALESCE(SUM(b.amount_paid), 0)
            FROM bookings b
            JOIN events e ON e.id = b.event_id
            WHERE e.organizer_email = $1 AND b.payment_status = 'paid'
            "#,
        )
        .bind(organizer_email)
        .fetch_one(&self.pool)
        .await?;

        timer.record();

        Ok(OrganizerDashboard {
            events: EventCounts {
                total: counts.0,
                published: counts.1,
                draft: counts.2,
                archived: counts.3,
            },
            tickets_booked,
            revenue,
            generated_at: Utc::now(),
        })
    }
}
