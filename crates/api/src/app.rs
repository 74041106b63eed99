use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::jwt::JwtConfig;

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{auth, cart, events, health, organizer, payments};
use crate::services::{AuthService, EmailService, PaymentGateway, RestPaymentGateway};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtConfig,
    pub auth: AuthService,
    pub payments: Arc<dyn PaymentGateway>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let jwt = JwtConfig::with_leeway(
        &config.jwt.secret,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.leeway_secs,
    );

    let email = EmailService::new(config.email.clone());
    let auth_service = AuthService::new(pool.clone(), email, jwt.clone());
    let payments: Arc<dyn PaymentGateway> =
        Arc::new(RestPaymentGateway::new(config.payment.clone()));

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        auth: auth_service,
        payments,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes: catalog browsing, auth entry points, and the
    // gateway callback (authenticated by its signature, not a session)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/categories", get(events::list_categories))
        .route("/api/v1/events", get(events::list_events))
        .route("/api/v1/events/:event_id", get(events::get_event))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/verify-otp", post(auth::verify_otp))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/payments/callback", post(payments::payment_callback));

    // Session-holder routes; the UserAuth extractor rejects missing or
    // revoked tokens per handler
    let user_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        .route(
            "/api/v1/events/:event_id/cart",
            get(cart::get_cart).delete(cart::clear_cart),
        )
        .route(
            "/api/v1/events/:event_id/cart/tickets",
            post(cart::select_tickets),
        )
        .route(
            "/api/v1/events/:event_id/cart/attendees",
            put(cart::set_attendees),
        )
        .route(
            "/api/v1/events/:event_id/payment/order",
            post(payments::create_order),
        )
        .route("/api/v1/my/bookings", get(payments::my_bookings));

    // Organizer routes; the OrganizerAuth extractor adds the 403 gate
    let organizer_routes = Router::new()
        .route(
            "/api/v1/organizer/events",
            get(organizer::list_events).post(organizer::create_event),
        )
        .route(
            "/api/v1/organizer/events/:event_id",
            get(organizer::get_event)
                .put(organizer::update_event)
                .delete(organizer::delete_event),
        )
        .route(
            "/api/v1/organizer/events/:event_id/tickets",
            get(organizer::list_tickets).post(organizer::create_ticket),
        )
        .route(
            "/api/v1/organizer/events/:event_id/tickets/:ticket_id",
            put(organizer::update_ticket).delete(organizer::delete_ticket),
        )
        .route(
            "/api/v1/organizer/events/:event_id/bookings",
            get(organizer::list_bookings),
        )
        .route(
            "/api/v1/organizer/events/:event_id/attendees",
            get(organizer::list_attendees),
        )
        .route(
            "/api/v1/organizer/events/:event_id/bookings/:booking_id",
            get(organizer::get_booking),
        )
        .route("/api/v1/organizer/dashboard", get(organizer::dashboard));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(organizer_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
