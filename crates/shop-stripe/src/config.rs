//! # Stripe Configuration
//!
//! Configuration for the Stripe integration. The secret key is loaded
//! from environment variables; the API base URL is overridable for tests.

use shop_core::OrderError;
use std::env;

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    pub fn from_env() -> Result<Self, OrderError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| {
            OrderError::Configuration("STRIPE_SECRET_KEY not set".to_string())
        })?;

        validate_secret_key(&secret_key)?;

        Ok(Self::new(secret_key))
    }

    /// Create config with an explicit key (for testing)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: "https://api.stripe.com".to_string(),
            api_version: "2024-12-18.acacia".to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Reject keys that are not Stripe secret keys
fn validate_secret_key(secret_key: &str) -> Result<(), OrderError> {
    if !secret_key.starts_with("sk_test_") && !secret_key.starts_with("sk_live_") {
        return Err(OrderError::Configuration(
            "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
        ));
    }
    Ok(())
}
