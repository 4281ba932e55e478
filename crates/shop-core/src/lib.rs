//! # shop-core
//!
//! Core types and traits for the shopfront order service.
//!
//! This crate provides:
//! - `Order`, `OrderStatus`, and the sanitized `OrderView` transport type
//! - `OrderStore`, `ProductStore`, and `PaymentProvider` traits at the
//!   seams to the data store and the hosted-checkout provider
//! - In-memory store implementations for default wiring and tests
//! - `OrderService` orchestrating creation and payment confirmation
//! - `OrderError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{Caller, OrderService, ProductRef};
//!
//! let service = OrderService::new(orders, products, payments);
//!
//! // Initiate checkout for one unit of a product
//! let caller = Caller::new("u1").with_email("u1@example.com");
//! let checkout = service
//!     .create(Some(ProductRef { id: "p1".into() }), &caller, origin)
//!     .await?;
//!
//! // Redirect the customer, then later:
//! let order = service.confirm(&checkout.id).await?;
//! ```

pub mod error;
pub mod memory;
pub mod order;
pub mod product;
pub mod provider;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use error::{OrderError, OrderResult};
pub use memory::{InMemoryOrderStore, InMemoryProductStore};
pub use order::{NewOrder, Order, OrderPatch, OrderStatus, OrderView};
pub use product::{Currency, Product, ProductCatalog};
pub use provider::{
    CheckoutRequest, CheckoutSession, PaymentProvider, PaymentStatus, SessionDetails,
    SharedPaymentProvider,
};
pub use service::{
    Caller, CreatedCheckout, ListParams, OrderService, ProductRef, DEFAULT_BASE_URL,
};
pub use store::{
    OrderFilter, OrderStore, ProductStore, SharedOrderStore, SharedProductStore,
};
