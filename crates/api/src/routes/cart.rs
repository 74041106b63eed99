//! Booking cart handlers: ticket selection and attendee details.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::{AttendeeRecord, BookingCart, TicketSelection, TicketType};
use persistence::entities::CartEntity;
use persistence::repositories::{CartRepository, EventRepository, TicketRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use shared::validation::validate_ticket_quantity;

/// Ticket selection request payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SelectTicketsRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_ticket_quantity"))]
    pub standard_qty: i32,

    #[serde(default)]
    #[validate(custom(function = "validate_ticket_quantity"))]
    pub vip_qty: i32,
}

/// Attendee details request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAttendeesRequest {
    pub attendees: Vec<AttendeeRecord>,
}

/// Cart state returned after each step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart: BookingCart,
}

fn cart_from_entity(entity: CartEntity) -> Result<BookingCart, ApiError> {
    BookingCart::try_from(entity)
        .map_err(|e| ApiError::Internal(format!("Corrupt cart state: {}", e)))
}

/// POST /api/v1/events/:event_id/cart/tickets
///
/// Replaces the user's cart for this event. Previously entered attendee
/// details and any open payment order are discarded.
pub async fn select_tickets(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<SelectTicketsRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    payload.validate()?;

    let events = EventRepository::new(state.pool.clone());
    events
        .find_published_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let selection = TicketSelection {
        standard_qty: payload.standard_qty.max(0) as u32,
        vip_qty: payload.vip_qty.max(0) as u32,
    };
    // Rejects an all-zero selection before anything is persisted
    BookingCart::select(auth.user_id(), event_id, selection)?;

    // Early availability check; the authoritative guard runs inside the
    // confirmation transaction.
    let tickets = TicketRepository::new(state.pool.clone());
    for (ticket_type, qty) in [
        (TicketType::Standard, selection.standard_qty),
        (TicketType::Vip, selection.vip_qty),
    ] {
        if qty == 0 {
            continue;
        }
        let tier = tickets
            .find_by_event_and_type(event_id, ticket_type)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Event has no {} ticket tier", ticket_type))
            })?;
        if (tier.available_quantity as u32) < qty {
            return Err(ApiError::Conflict(format!(
                "Not enough {} tickets remaining",
                ticket_type
            )));
        }
    }

    let entity = CartRepository::new(state.pool.clone())
        .upsert_selection(
            auth.user_id(),
            event_id,
            selection.standard_qty,
            selection.vip_qty,
        )
        .await?;

    Ok(Json(CartResponse {
        cart: cart_from_entity(entity)?,
    }))
}

/// PUT /api/v1/events/:event_id/cart/attendees
///
/// Stores one attendee record per selected seat. Counts must match the
/// selection exactly; every contact field must be non-empty.
pub async fn set_attendees(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<SetAttendeesRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let carts = CartRepository::new(state.pool.clone());

    let entity = carts
        .find(auth.user_id(), event_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid booking flow".to_string()))?;

    // Validate against the selected quantities before persisting
    let mut cart = cart_from_entity(entity)?;
    cart.set_attendees(payload.attendees.clone())?;

    let entity = carts
        .set_attendees(auth.user_id(), event_id, &payload.attendees)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid booking flow".to_string()))?;

    Ok(Json(CartResponse {
        cart: cart_from_entity(entity)?,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCartResponse {
    pub status: String,
}

/// DELETE /api/v1/events/:event_id/cart
///
/// Abandons the booking attempt. Clearing an absent cart is a no-op.
pub async fn clear_cart(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ClearCartResponse>, ApiError> {
    CartRepository::new(state.pool.clone())
        .delete(auth.user_id(), event_id)
        .await?;

    Ok(Json(ClearCartResponse {
        status: "cleared".to_string(),
    }))
}

/// GET /api/v1/events/:event_id/cart
pub async fn get_cart(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<CartResponse>, ApiError> {
    let entity = CartRepository::new(state.pool.clone())
        .find(auth.user_id(), event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No cart for this event".to_string()))?;

    Ok(Json(CartResponse {
        cart: cart_from_entity(entity)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_tickets_request_quantity_bounds() {
        let req = SelectTicketsRequest {
            standard_qty: 11,
            vip_qty: 0,
        };
        assert!(req.validate().is_err());

        let req = SelectTicketsRequest {
            standard_qty: 2,
            vip_qty: 10,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_select_tickets_request_defaults_to_zero() {
        let req: SelectTicketsRequest = serde_json::from_str(r#"{"vipQty": 1}"#).unwrap();
        assert_eq!(req.standard_qty, 0);
        assert_eq!(req.vip_qty, 1);
    }
}
