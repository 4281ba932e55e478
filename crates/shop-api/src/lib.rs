//! # shop-api
//!
//! HTTP API layer for shopfront-rs.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/orders` | List the caller's orders |
//! | POST | `/orders` | Create an order / start checkout |
//! | GET | `/orders/{id}` | Fetch one order |
//! | POST | `/orders/confirm` | Confirm payment for a session |
//!
//! The caller's identity arrives in `x-user-id` / `x-user-email` headers
//! set by the upstream auth layer.

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
