//! Public event catalog handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use domain::models::{Category, Event, EventFilter, Ticket};
use persistence::repositories::{CategoryRepository, EventRepository, TicketRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// One page of the published event listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    pub events: Vec<Event>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Published event detail with its ticket tiers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailResponse {
    pub event: Event,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let repo = CategoryRepository::new(state.pool.clone());
    let categories = repo.list().await?.into_iter().map(Into::into).collect();

    Ok(Json(CategoryListResponse { categories }))
}

/// GET /api/v1/events
///
/// Filters are conjunctive; an out-of-range page clamps to the last page
/// rather than erroring.
pub async fn list_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<EventListResponse>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let page = repo.list_published(&filter).await?;

    Ok(Json(EventListResponse {
        events: page.events.into_iter().map(Into::into).collect(),
        page: page.page,
        per_page: persistence::repositories::EVENTS_PER_PAGE,
        total: page.total_count,
        total_pages: page.total_pages,
    }))
}

/// GET /api/v1/events/:event_id
///
/// Only published events are visible here; drafts and archived events
/// 404 regardless of who asks.
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetailResponse>, ApiError> {
    let events = EventRepository::new(state.pool.clone());
    let event = events
        .find_published_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let tickets = TicketRepository::new(state.pool.clone())
        .list_by_event(event_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(EventDetailResponse {
        event: event.into(),
        tickets,
    }))
}
