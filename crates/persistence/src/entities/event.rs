//! Event entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::{EventStatus, EventType};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub banner_image_url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub location: String,
    pub event_type: String,
    pub status: String,
    pub organizer_name: String,
    pub organizer_email: String,
    pub organizer_phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<EventEntity> for domain::models::Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            category_id: entity.category_id,
            banner_image_url: entity.banner_image_url,
            start_date: entity.start_date,
            end_date: entity.end_date,
            start_time: entity.start_time,
            location: entity.location,
            event_type: EventType::from_str(&entity.event_type).unwrap_or(EventType::Free),
            status: EventStatus::from_str(&entity.status).unwrap_or(EventStatus::Draft),
            organizer_name: entity.organizer_name,
            organizer_email: entity.organizer_email,
            organizer_phone: entity.organizer_phone,
            created_at: entity.created_at,
        }
    }
}
