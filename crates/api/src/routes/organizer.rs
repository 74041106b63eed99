//! Organizer management handlers: events, ticket tiers, bookings,
//! attendee rosters, and the dashboard rollup.
//!
//! Every handler is behind [`OrganizerAuth`]; ownership is enforced by
//! scoping queries to the caller's email, so foreign events read as 404.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    Attendee, BookingSummary, Event, EventStatus, EventType, OrganizerDashboard, Ticket,
    TicketType,
};
use persistence::repositories::{
    BookingRepository, DashboardRepository, EventRepository, EventWrite, TicketRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OrganizerAuth;

/// Event create/update payload. Organizer contact fields are not
/// accepted here; they come from the authenticated account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub category_id: Option<Uuid>,

    #[validate(url(message = "Banner image must be a valid URL"))]
    pub banner_image_url: Option<String>,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,

    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,

    pub event_type: EventType,

    #[serde(default = "default_status")]
    pub status: EventStatus,
}

fn default_status() -> EventStatus {
    EventStatus::Draft
}

impl EventRequest {
    /// Payload-level checks that span more than one field.
    fn check_dates(&self) -> Result<(), ApiError> {
        if self.end_date < self.start_date {
            return Err(ApiError::Validation(
                "End date must not precede start date".to_string(),
            ));
        }
        Ok(())
    }

    fn to_write(&self) -> EventWrite {
        EventWrite {
            title: self.title.clone(),
            description: self.description.clone(),
            category_id: self.category_id,
            banner_image_url: self.banner_image_url.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            location: self.location.clone(),
            event_type: self.event_type,
            status: self.status,
        }
    }
}

/// Ticket tier create/update payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    pub ticket_type: TicketType,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub available_quantity: i32,
}

fn validate_price(price: &Decimal) -> Result<(), validator::ValidationError> {
    if price.is_sign_negative() {
        return Err(validator::ValidationError::new("price_negative"));
    }
    Ok(())
}

/// Tier update payload; the type itself is fixed at creation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdateRequest {
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub available_quantity: i32,
}

/// Attendee roster query filters.
#[derive(Debug, Default, Deserialize)]
pub struct AttendeeFilter {
    pub gender: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event: Event,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListResponse {
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub ticket: Ticket,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListResponse {
    pub bookings: Vec<BookingSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailResponse {
    pub booking: BookingSummary,
    pub attendees: Vec<Attendee>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeListResponse {
    pub attendees: Vec<Attendee>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub status: String,
}

/// GET /api/v1/organizer/events
pub async fn list_events(
    State(state): State<AppState>,
    auth: OrganizerAuth,
) -> Result<Json<EventListResponse>, ApiError> {
    let events = EventRepository::new(state.pool.clone())
        .list_by_organizer(&auth.0.user.email)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(EventListResponse { events }))
}

/// POST /api/v1/organizer/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Json(payload): Json<EventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    payload.validate()?;
    payload.check_dates()?;

    let user = &auth.0.user;
    let entity = EventRepository::new(state.pool.clone())
        .create(&payload.to_write(), &user.username, &user.email, &user.phone)
        .await?;

    info!(event_id = %entity.id, organizer = %user.email, "Event created");

    Ok(Json(EventResponse {
        event: entity.into(),
    }))
}

/// GET /api/v1/organizer/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let entity = EventRepository::new(state.pool.clone())
        .find_by_id_for_organizer(event_id, &auth.0.user.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    Ok(Json(EventResponse {
        event: entity.into(),
    }))
}

/// PUT /api/v1/organizer/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<EventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    payload.validate()?;
    payload.check_dates()?;

    let entity = EventRepository::new(state.pool.clone())
        .update(event_id, &auth.0.user.email, &payload.to_write())
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    Ok(Json(EventResponse {
        event: entity.into(),
    }))
}

/// DELETE /api/v1/organizer/events/:event_id
///
/// Tiers, carts, and bookings under the event go with it (ON DELETE
/// CASCADE).
pub async fn delete_event(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let removed = EventRepository::new(state.pool.clone())
        .delete(event_id, &auth.0.user.email)
        .await?;

    if !removed {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    info!(event_id = %event_id, organizer = %auth.0.user.email, "Event deleted");

    Ok(Json(DeleteResponse {
        status: "deleted".to_string(),
    }))
}

/// Resolves an event owned by the caller or 404s.
async fn owned_event(
    state: &AppState,
    auth: &OrganizerAuth,
    event_id: Uuid,
) -> Result<(), ApiError> {
    EventRepository::new(state.pool.clone())
        .find_by_id_for_organizer(event_id, &auth.0.user.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;
    Ok(())
}

/// GET /api/v1/organizer/events/:event_id/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<TicketListResponse>, ApiError> {
    owned_event(&state, &auth, event_id).await?;

    let tickets = TicketRepository::new(state.pool.clone())
        .list_by_event(event_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(TicketListResponse { tickets }))
}

/// POST /api/v1/organizer/events/:event_id/tickets
///
/// One tier per type and event; a duplicate type comes back as 409.
pub async fn create_ticket(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<TicketRequest>,
) -> Result<Json<TicketResponse>, ApiError> {
    payload.validate()?;
    owned_event(&state, &auth, event_id).await?;

    let entity = TicketRepository::new(state.pool.clone())
        .create(
            event_id,
            payload.ticket_type,
            payload.price,
            payload.available_quantity,
        )
        .await?;

    Ok(Json(TicketResponse {
        ticket: entity.into(),
    }))
}

/// PUT /api/v1/organizer/events/:event_id/tickets/:ticket_id
pub async fn update_ticket(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path((event_id, ticket_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<TicketUpdateRequest>,
) -> Result<Json<TicketResponse>, ApiError> {
    payload.validate()?;
    owned_event(&state, &auth, event_id).await?;

    let entity = TicketRepository::new(state.pool.clone())
        .update(ticket_id, event_id, payload.price, payload.available_quantity)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket tier not found".to_string()))?;

    Ok(Json(TicketResponse {
        ticket: entity.into(),
    }))
}

/// DELETE /api/v1/organizer/events/:event_id/tickets/:ticket_id
pub async fn delete_ticket(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path((event_id, ticket_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    owned_event(&state, &auth, event_id).await?;

    let removed = TicketRepository::new(state.pool.clone())
        .delete(ticket_id, event_id)
        .await?;

    if !removed {
        return Err(ApiError::NotFound("Ticket tier not found".to_string()));
    }

    Ok(Json(DeleteResponse {
        status: "deleted".to_string(),
    }))
}

/// GET /api/v1/organizer/events/:event_id/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<BookingListResponse>, ApiError> {
    owned_event(&state, &auth, event_id).await?;

    let bookings = BookingRepository::new(state.pool.clone())
        .list_for_event(event_id, &auth.0.user.email)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(BookingListResponse { bookings }))
}

/// GET /api/v1/organizer/events/:event_id/attendees
///
/// Filters combine; `gender=all` and a blank search match everyone.
pub async fn list_attendees(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(event_id): Path<Uuid>,
    Query(filter): Query<AttendeeFilter>,
) -> Result<Json<AttendeeListResponse>, ApiError> {
    owned_event(&state, &auth, event_id).await?;

    let attendees = BookingRepository::new(state.pool.clone())
        .list_attendees_for_event(
            event_id,
            &auth.0.user.email,
            filter.gender.as_deref(),
            filter.search.as_deref(),
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(AttendeeListResponse { attendees }))
}

/// GET /api/v1/organizer/events/:event_id/bookings/:booking_id
pub async fn get_booking(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path((event_id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BookingDetailResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());

    let row = repo
        .find_for_organizer(booking_id, &auth.0.user.email)
        .await?
        .filter(|row| row.booking.event_id == event_id)
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    let attendees = repo
        .list_attendees_for_booking(booking_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(BookingDetailResponse {
        booking: row.into(),
        attendees,
    }))
}

/// GET /api/v1/organizer/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: OrganizerAuth,
) -> Result<Json<OrganizerDashboard>, ApiError> {
    let summary = DashboardRepository::new(state.pool.clone())
        .summarize(&auth.0.user.email)
        .await?;

    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_request(start: &str, end: &str) -> EventRequest {
        EventRequest {
            title: "Jazz Night".to_string(),
            description: "An evening of live jazz".to_string(),
            category_id: None,
            banner_image_url: None,
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            start_time: "19:00:00".parse().unwrap(),
            location: "Blue Note Hall".to_string(),
            event_type: EventType::Paid,
            status: EventStatus::Published,
        }
    }

    #[test]
    fn test_event_dates_must_be_ordered() {
        assert!(event_request("2026-09-02", "2026-09-01").check_dates().is_err());
        assert!(event_request("2026-09-01", "2026-09-01").check_dates().is_ok());
        assert!(event_request("2026-09-01", "2026-09-03").check_dates().is_ok());
    }

    #[test]
    fn test_event_request_defaults_to_draft() {
        let req: EventRequest = serde_json::from_str(
            r#"{
                "title": "Jazz Night",
                "description": "An evening of live jazz",
                "startDate": "2026-09-01",
                "endDate": "2026-09-01",
                "startTime": "19:00:00",
                "location": "Blue Note Hall",
                "eventType": "paid"
            }"#,
        )
        .unwrap();
        assert_eq!(req.status, EventStatus::Draft);
    }

    #[test]
    fn test_ticket_request_rejects_negative_price() {
        let req = TicketRequest {
            ticket_type: TicketType::Standard,
            price: Decimal::from_str_exact("-1.00").unwrap(),
            available_quantity: 50,
        };
        assert!(req.validate().is_err());

        let req = TicketRequest {
            ticket_type: TicketType::Vip,
            price: Decimal::ZERO,
            available_quantity: 0,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_ticket_request_rejects_negative_quantity() {
        let req = TicketRequest {
            ticket_type: TicketType::Standard,
            price: Decimal::from_str_exact("250.00").unwrap(),
            available_quantity: -5,
        };
        assert!(req.validate().is_err());
    }
}
