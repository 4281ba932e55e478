//! # shop-stripe
//!
//! Stripe payment provider for shopfront-rs.
//!
//! Implements `shop_core::PaymentProvider` over Stripe's Checkout
//! Sessions API: the service creates a hosted session for one unit of a
//! product and later retrieves it by id to confirm payment.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_stripe::StripeCheckoutProvider;
//!
//! // Reads STRIPE_SECRET_KEY from the environment
//! let provider = StripeCheckoutProvider::from_env()?;
//!
//! let session = provider.create_checkout_session(&request).await?;
//! // Redirect the customer using session.id, then later:
//! let details = provider.retrieve_session(&session.id).await?;
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutProvider;
pub use config::StripeConfig;
