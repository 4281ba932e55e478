//! # Request Handlers
//!
//! Axum request handlers for the order API. Handlers validate input,
//! delegate to the `OrderService`, and map `OrderError` to HTTP responses.

use crate::auth::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use shop_core::{CreatedCheckout, ListParams, OrderError, OrderView, ProductRef};
use tracing::instrument;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create order request: `{ "product": { "id": "..." } }`
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub product: Option<ProductRef>,
}

/// Confirm request: `{ "checkout_session": "..." }`
#[derive(Debug, Deserialize)]
pub struct ConfirmOrderRequest {
    pub checkout_session: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

fn order_error_to_response(err: OrderError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shopfront",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List the caller's orders. `status` and `product` filter exactly;
/// `_q` switches to free-text search.
#[instrument(skip(state, user, params))]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<OrderView>>, (StatusCode, Json<ErrorResponse>)> {
    let orders = state
        .service
        .list(&user.0, params)
        .await
        .map_err(order_error_to_response)?;

    Ok(Json(orders))
}

/// Fetch one of the caller's orders; absent or unowned is 404
#[instrument(skip(state, user))]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, (StatusCode, Json<ErrorResponse>)> {
    let order = state
        .service
        .get_one(&id, &user.0)
        .await
        .map_err(order_error_to_response)?;

    Ok(Json(order))
}

/// Create an order: starts a hosted checkout session and persists the
/// unpaid order. Returns only the session id; the caller redirects the
/// customer to the provider's page.
#[instrument(skip(state, user, headers, request))]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<CreatedCheckout>, (StatusCode, Json<ErrorResponse>)> {
    let origin = headers.get("origin").and_then(|v| v.to_str().ok());

    let checkout = state
        .service
        .create(request.product, &user.0, origin)
        .await
        .map_err(order_error_to_response)?;

    Ok(Json(checkout))
}

/// Confirm payment for a checkout session and return the updated order
#[instrument(skip(state, request))]
pub async fn confirm_order(
    State(state): State<AppState>,
    Json(request): Json<ConfirmOrderRequest>,
) -> Result<Json<OrderView>, (StatusCode, Json<ErrorResponse>)> {
    let order = state
        .service
        .confirm(&request.checkout_session)
        .await
        .map_err(order_error_to_response)?;

    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_order_error_conversion() {
        let (status, Json(body)) = order_error_to_response(OrderError::MissingProduct);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Please specify a product");

        let (status, _) = order_error_to_response(OrderError::OrderNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = order_error_to_response(OrderError::Network("down".into()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_create_request_allows_missing_product() {
        let request: CreateOrderRequest = serde_json::from_str("{}").unwrap();
        assert!(request.product.is_none());

        let request: CreateOrderRequest =
            serde_json::from_str(r#"{"product": {"id": "p1"}}"#).unwrap();
        assert_eq!(request.product.unwrap().id, "p1");
    }
}
