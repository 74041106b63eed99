//! Event repository for database operations.

use chrono::{NaiveDate, NaiveTime};
use domain::models::{EventFilter, EventStatus, EventType};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

/// Events shown per listing page.
pub const EVENTS_PER_PAGE: i64 = 6;

/// One page of the public event listing.
#[derive(Debug, Clone)]
pub struct EventPage {
    pub events: Vec<EventEntity>,
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

/// Fields accepted when creating or updating an event.
#[derive(Debug, Clone)]
pub struct EventWrite {
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub banner_image_url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub location: String,
    pub event_type: EventType,
    pub status: EventStatus,
}

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, title, description, category_id, banner_image_url,
                   start_date, end_date, start_time, location, event_type, status,
                   organizer_name, organizer_email, organizer_phone, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a published event by ID (public detail and booking flow).
    pub async fn find_published_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_published_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, title, description, category_id, banner_image_url,
                   start_date, end_date, start_time, location, event_type, status,
                   organizer_name, organizer_email, organizer_phone, created_at
            FROM events
            WHERE id = $1 AND status = 'published'
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List published events matching the given filters, newest first,
    /// six per page. An out-of-range page clamps to the last page.
    pub async fn list_published(&self, filter: &EventFilter) -> Result<EventPage, sqlx::Error> {
        let timer = QueryTimer::new("list_published_events");

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM events e");
        push_filters(&mut count_qb, filter);
        let total_count: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let total_pages = ((total_count + EVENTS_PER_PAGE - 1) / EVENTS_PER_PAGE).max(1);
        let page = i64::from(filter.page()).min(total_pages);

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT e.id, e.title, e.description, e.category_id, e.banner_image_url,
                   e.start_date, e.end_date, e.start_time, e.location, e.event_type,
                   e.status, e.organizer_name, e.organizer_email, e.organizer_phone,
                   e.created_at
            FROM events e
            "#,
        );
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY e.created_at DESC LIMIT ");
        qb.push_bind(EVENTS_PER_PAGE);
        qb.push(" OFFSET ");
        qb.push_bind((page - 1) * EVENTS_PER_PAGE);

        let events = qb
            .build_query_as::<EventEntity>()
            .fetch_all(&self.pool)
            .await?;
        timer.record();

        Ok(EventPage {
            events,
            page,
            total_pages,
            total_count,
        })
    }

    /// List all events owned by an organizer, newest first.
    pub async fn list_by_organizer(
        &self,
        organizer_email: &str,
    ) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_by_organizer");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, title, description, category_id, banner_image_url,
                   start_date, end_date, start_time, location, event_type, status,
                   organizer_name, organizer_email, organizer_phone, created_at
            FROM events
            WHERE organizer_email = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organizer_email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID, scoped to its organizer.
    pub async fn find_by_id_for_organizer(
        &self,
        id: Uuid,
        organizer_email: &str,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_for_organizer");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, title, description, category_id, banner_image_url,
                   start_date, end_date, start_time, location, event_type, status,
                   organizer_name, organizer_email, organizer_phone, created_at
            FROM events
            WHERE id = $1 AND organizer_email = $2
            "#,
        )
        .bind(id)
        .bind(organizer_email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create an event on behalf of an organizer. Contact fields are taken
    /// from the organizer's account, not the request.
    pub async fn create(
        &self,
        write: &EventWrite,
        organizer_name: &str,
        organizer_email: &str,
        organizer_phone: &str,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (title, description, category_id, banner_image_url,
                                start_date, end_date, start_time, location,
                                event_type, status,
                                organizer_name, organizer_email, organizer_phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, title, description, category_id, banner_image_url,
                      start_date, end_date, start_time, location, event_type, status,
                      organizer_name, organizer_email, organizer_phone, created_at
            "#,
        )
        .bind(&write.title)
        .bind(&write.description)
        .bind(write.category_id)
        .bind(&write.banner_image_url)
        .bind(write.start_date)
        .bind(write.end_date)
        .bind(write.start_time)
        .bind(&write.location)
        .bind(write.event_type.as_str())
        .bind(write.status.as_str())
        .bind(organizer_name)
        .bind(organizer_email)
        .bind(organizer_phone)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an event, scoped to its organizer. Returns None when the
    /// event does not exist or belongs to someone else.
    pub async fn update(
        &self,
        id: Uuid,
        organizer_email: &str,
        write: &EventWrite,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET title = $3, description = $4, category_id = $5, banner_image_url = $6,
                start_date = $7, end_date = $8, start_time = $9, location = $10,
                event_type = $11, status = $12
            WHERE id = $1 AND organizer_email = $2
            RETURNING id, title, description, category_id, banner_image_url,
                      start_date, end_date, start_time, location, event_type, status,
                      organizer_name, organizer_email, organizer_phone, created_at
            "#,
        )
        .bind(id)
        .bind(organizer_email)
        .bind(&write.title)
        .bind(&write.description)
        .bind(write.category_id)
        .bind(&write.banner_image_url)
        .bind(write.start_date)
        .bind(write.end_date)
        .bind(write.start_time)
        .bind(&write.location)
        .bind(write.event_type.as_str())
        .bind(write.status.as_str())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event, scoped to its organizer. Returns whether a row
    /// was removed.
    pub async fn delete(&self, id: Uuid, organizer_email: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND organizer_email = $2")
            .bind(id)
            .bind(organizer_email)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}

/// Appends WHERE clauses for the public listing filters. Used by both
/// the count query and the page query so the two always agree.
fn push_filters(qb: &mut QueryBuilder<Postgres>, filter: &EventFilter) {
    qb.push(" WHERE e.status = 'published'");

    if let Some(category) = filter.category_filter() {
        qb.push(
            " AND e.category_id IN (SELECT id FROM categories WHERE LOWER(name) = LOWER(",
        );
        qb.push_bind(category.to_string());
        qb.push("))");
    }

    if let Some(date) = filter.date {
        qb.push(" AND e.start_date = ");
        qb.push_bind(date);
    }

    if let Some(event_type) = filter.event_type_filter() {
        qb.push(" AND e.event_type = ");
        qb.push_bind(event_type.to_lowercase());
    }

    if let Some(search) = filter.search_filter() {
        let pattern = format!("%{}%", search);
        qb.push(" AND (e.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR e.description ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR e.location ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of(filter: &EventFilter) -> String {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM events e");
        push_filters(&mut qb, filter);
        qb.into_sql()
    }

    #[test]
    fn test_filters_always_restrict_to_published() {
        let sql = sql_of(&EventFilter::default());
        assert!(sql.contains("e.status = 'published'"));
        assert!(!sql.contains("category_id IN"));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn test_all_sentinel_skips_filter() {
        let filter = EventFilter {
            category: Some("all".to_string()),
            event_type: Some("All".to_string()),
            ..Default::default()
        };
        let sql = sql_of(&filter);
        assert!(!sql.contains("category_id IN"));
        assert!(!sql.contains("event_type"));
    }

    #[test]
    fn test_search_matches_three_columns() {
        let filter = EventFilter {
            search: Some("music".to_string()),
            ..Default::default()
        };
        let sql = sql_of(&filter);
        assert!(sql.contains("e.title ILIKE"));
        assert!(sql.contains("e.description ILIKE"));
        assert!(sql.contains("e.location ILIKE"));
    }

    #[test]
    fn test_combined_filters_are_conjunctive() {
        let filter = EventFilter {
            category: Some("Music".to_string()),
            date: Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()),
            event_type: Some("paid".to_string()),
            search: Some("jazz".to_string()),
            ..Default::default()
        };
        let sql = sql_of(&filter);
        assert!(sql.matches(" AND ").count() >= 4);
    }
}
