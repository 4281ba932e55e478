//! # Caller Extraction
//!
//! Authentication itself is handled upstream (gateway or auth middleware);
//! by the time a request reaches this service the authenticated identity
//! arrives in `x-user-id` / `x-user-email` headers. This extractor turns
//! those into an explicit `Caller` parameter for the handlers.

use crate::handlers::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use shop_core::Caller;

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct AuthUser(pub Caller);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new("Missing authenticated user", 401)),
                )
            })?;

        let email = parts
            .headers
            .get("x-user-email")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut caller = Caller::new(user_id);
        caller.email = email;

        Ok(AuthUser(caller))
    }
}
