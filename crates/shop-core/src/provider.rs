//! # Payment Provider Trait
//!
//! Seam between the order service and the hosted-checkout provider.
//! Implementations: Stripe (shop-stripe); tests use in-crate fakes.

use crate::error::OrderResult;
use crate::product::Currency;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters for creating a hosted checkout session.
///
/// The service always requests exactly one unit of one product; the
/// success URL embeds the provider's session-id placeholder so the
/// customer lands back with the id needed for confirmation.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Display name shown on the hosted page
    pub product_name: String,

    /// Amount in smallest currency unit
    pub unit_amount: i64,

    /// Currency for the charge
    pub currency: Currency,

    /// Units purchased
    pub quantity: u32,

    /// Customer email for prefill (if known)
    pub customer_email: Option<String>,

    /// Redirect after successful payment
    pub success_url: String,

    /// Redirect if the customer abandons checkout
    pub cancel_url: String,
}

/// A checkout session created at the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's opaque session id
    pub id: String,

    /// Hosted page URL the customer is redirected to
    pub url: String,
}

/// Payment state of a session as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    Unknown(String),
}

impl PaymentStatus {
    /// Parse the provider's `payment_status` string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "paid" => PaymentStatus::Paid,
            "unpaid" => PaymentStatus::Unpaid,
            "no_payment_required" => PaymentStatus::NoPaymentRequired,
            other => PaymentStatus::Unknown(other.to_string()),
        }
    }

    /// Only `paid` flips an order's status
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

/// A session retrieved from the provider for confirmation
#[derive(Debug, Clone)]
pub struct SessionDetails {
    /// Provider's session id
    pub id: String,

    /// Payment state of the session
    pub payment_status: PaymentStatus,
}

/// Trait for hosted-checkout payment providers.
///
/// The order service only ever creates a session and later retrieves it
/// by id; everything else (card handling, 3DS, receipts) stays on the
/// provider's side.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session and return its id and URL.
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> OrderResult<CheckoutSession>;

    /// Retrieve a session by id to inspect its payment status.
    async fn retrieve_session(&self, session_id: &str) -> OrderResult<SessionDetails>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type SharedPaymentProvider = Arc<dyn PaymentProvider>;
