//! Payment order creation, gateway callback, and booking listings.

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::{BookingCart, BookingSummary, EventType, TicketType};
use persistence::repositories::{BookingRepository, CartRepository, EventRepository, TicketRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_bookings_confirmed;
use crate::services::payment::PaymentError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub status: String,
    pub order_id: String,
    pub amount_due: Decimal,
    pub currency: String,
}

/// A payment order opens for paid carts; free carts confirm on the spot.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OrderOutcome {
    Pending(CreateOrderResponse),
    Confirmed(PaymentCallbackResponse),
}

/// Gateway confirmation callback payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallbackRequest {
    #[validate(length(min = 1, message = "Order id is required"))]
    pub order_id: String,

    #[validate(length(min = 1, message = "Payment id is required"))]
    pub payment_id: String,

    /// HMAC signature; verified when a webhook secret is configured.
    #[serde(default)]
    pub signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallbackResponse {
    pub status: String,
    pub booking_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListResponse {
    pub bookings: Vec<BookingSummary>,
}

/// Sums the cart's seats at current tier prices. A seat whose tier no
/// longer exists fails the whole computation.
async fn compute_total(
    tickets: &TicketRepository,
    cart: &BookingCart,
) -> Result<Decimal, ApiError> {
    let mut total = Decimal::ZERO;
    for (ticket_type, qty) in [
        (TicketType::Standard, cart.selection.standard_qty),
        (TicketType::Vip, cart.selection.vip_qty),
    ] {
        if qty == 0 {
            continue;
        }
        let tier = tickets
            .find_by_event_and_type(cart.event_id, ticket_type)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Event has no {} ticket tier", ticket_type))
            })?;
        total += tier.price * Decimal::from(qty);
    }
    Ok(total)
}

/// POST /api/v1/events/:event_id/payment/order
///
/// Opens a gateway order for the cart total and binds it to the cart.
/// Nothing is persisted when the gateway call fails. A zero total (free
/// event) skips the gateway and confirms the booking immediately.
pub async fn create_order(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<OrderOutcome>, ApiError> {
    let events = EventRepository::new(state.pool.clone());
    let event: domain::models::Event = events
        .find_published_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?
        .into();

    let carts = CartRepository::new(state.pool.clone());
    let entity = carts
        .find(auth.user_id(), event_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid booking flow".to_string()))?;
    let cart = BookingCart::try_from(entity)
        .map_err(|e| ApiError::Internal(format!("Corrupt cart state: {}", e)))?;

    if !cart.ready_for_payment() {
        return Err(ApiError::Validation("Invalid booking flow".to_string()));
    }

    let tickets = TicketRepository::new(state.pool.clone());
    let total = compute_total(&tickets, &cart).await?;

    if event.event_type == EventType::Free || total.is_zero() {
        let booking_ids = BookingRepository::new(state.pool.clone())
            .confirm_free_booking(&cart, "free_entry")
            .await?;
        record_bookings_confirmed(booking_ids.len());
        info!(event_id = %event_id, seats = booking_ids.len(), "Free booking confirmed");

        return Ok(Json(OrderOutcome::Confirmed(PaymentCallbackResponse {
            status: "confirmed".to_string(),
            booking_ids,
        })));
    }

    let receipt = format!("cart_{}_{}", auth.user_id(), event_id);
    let order = state
        .payments
        .create_order(total, &receipt)
        .await
        .map_err(|e| match e {
            PaymentError::InvalidAmount(msg) => ApiError::Validation(msg),
            other => ApiError::ServiceUnavailable(other.to_string()),
        })?;

    carts
        .bind_order(auth.user_id(), event_id, &order.id, total)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid booking flow".to_string()))?;

    info!(order_id = %order.id, event_id = %event_id, "Payment order bound to cart");

    Ok(Json(OrderOutcome::Pending(CreateOrderResponse {
        status: "payment_pending".to_string(),
        order_id: order.id,
        amount_due: total,
        currency: order.currency,
    })))
}

/// POST /api/v1/payments/callback
///
/// Confirms the booking for the cart bound to the order id, inside one
/// transaction. A replayed callback finds no cart and gets 404, so
/// duplicate gateway deliveries cannot double-book.
pub async fn payment_callback(
    State(state): State<AppState>,
    Json(payload): Json<PaymentCallbackRequest>,
) -> Result<Json<PaymentCallbackResponse>, ApiError> {
    payload.validate()?;

    if !state
        .payments
        .verify_signature(&payload.order_id, &payload.payment_id, &payload.signature)
    {
        warn!(order_id = %payload.order_id, "Payment callback signature mismatch");
        return Err(ApiError::Unauthorized(
            "Invalid payment signature".to_string(),
        ));
    }

    let carts = CartRepository::new(state.pool.clone());
    let entity = carts
        .find_by_order_id(&payload.order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Unknown payment order".to_string()))?;
    let cart = BookingCart::try_from(entity)
        .map_err(|e| ApiError::Internal(format!("Corrupt cart state: {}", e)))?;

    let bookings = BookingRepository::new(state.pool.clone());
    let booking_ids = bookings
        .confirm_paid_booking(&cart, &payload.payment_id)
        .await?;
    record_bookings_confirmed(booking_ids.len());

    info!(
        order_id = %payload.order_id,
        seats = booking_ids.len(),
        "Booking confirmed"
    );

    Ok(Json(PaymentCallbackResponse {
        status: "confirmed".to_string(),
        booking_ids,
    }))
}

/// GET /api/v1/my/bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<BookingListResponse>, ApiError> {
    let bookings = BookingRepository::new(state.pool.clone())
        .list_for_user(auth.user_id())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(BookingListResponse { bookings }))
}
