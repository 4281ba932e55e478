//! # Routes
//!
//! Axum router configuration for the order API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - GET  /orders - List the caller's orders (filters + `_q` search)
/// - POST /orders - Create an order / start checkout
/// - GET  /orders/{id} - Fetch one order
/// - POST /orders/confirm - Confirm payment for a checkout session
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let order_routes = Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/confirm", post(handlers::confirm_order))
        .route("/{id}", get(handlers::get_order));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/orders", order_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
