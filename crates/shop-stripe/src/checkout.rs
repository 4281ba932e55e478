//! # Stripe Checkout Sessions
//!
//! `PaymentProvider` implementation backed by Stripe's Checkout Sessions
//! API: form-encoded session creation and JSON session retrieval.

use crate::config::StripeConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shop_core::{
    CheckoutRequest, CheckoutSession, OrderError, OrderResult, PaymentProvider, PaymentStatus,
    SessionDetails,
};
use tracing::{debug, error, info, instrument};

/// Stripe hosted-checkout provider
pub struct StripeCheckoutProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutProvider {
    /// Create a new provider over the given configuration
    pub fn new(config: StripeConfig) -> OrderResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| OrderError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> OrderResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Form parameters for a single-line-item checkout session
    fn build_form_params(request: &CheckoutRequest) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            (
                "line_items[0][price_data][currency]".to_string(),
                request.currency.as_str().to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                request.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.product_name.clone(),
            ),
            (
                "line_items[0][quantity]".to_string(),
                request.quantity.to_string(),
            ),
        ];

        if let Some(ref email) = request.customer_email {
            params.push(("customer_email".to_string(), email.clone()));
        }

        params
    }

    /// Map a non-success Stripe response to a provider error
    fn provider_error(status: reqwest::StatusCode, body: &str) -> OrderError {
        error!("Stripe API error: status={}, body={}", status, body);

        if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(body) {
            return OrderError::Provider {
                provider: "stripe".to_string(),
                message: error_response.error.message,
            };
        }

        OrderError::Provider {
            provider: "stripe".to_string(),
            message: format!("HTTP {status}: {body}"),
        }
    }
}

#[async_trait]
impl PaymentProvider for StripeCheckoutProvider {
    #[instrument(skip(self, request), fields(amount = request.unit_amount))]
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> OrderResult<CheckoutSession> {
        if request.unit_amount <= 0 {
            return Err(OrderError::InvalidRequest(
                "unit_amount must be positive".to_string(),
            ));
        }

        let form_params = Self::build_form_params(request);

        debug!(
            "Creating Stripe checkout session: {} x{} ({} {})",
            request.product_name, request.quantity, request.unit_amount, request.currency
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| OrderError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OrderError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::provider_error(status, &body));
        }

        let session: StripeSessionResponse = serde_json::from_str(&body).map_err(|e| {
            OrderError::Serialization(format!("Failed to parse Stripe response: {e}"))
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CheckoutSession {
            id: session.id,
            url: session.url.unwrap_or_default(),
        })
    }

    #[instrument(skip(self))]
    async fn retrieve_session(&self, session_id: &str) -> OrderResult<SessionDetails> {
        let url = format!(
            "{}/v1/checkout/sessions/{}",
            self.config.api_base_url, session_id
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| OrderError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OrderError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::provider_error(status, &body));
        }

        let session: StripeSessionResponse = serde_json::from_str(&body).map_err(|e| {
            OrderError::Serialization(format!("Failed to parse Stripe response: {e}"))
        })?;

        let payment_status = session
            .payment_status
            .as_deref()
            .map(PaymentStatus::parse)
            .unwrap_or(PaymentStatus::Unknown("missing".to_string()));

        debug!(
            "Retrieved Stripe session: id={}, payment_status={:?}",
            session.id, payment_status
        );

        Ok(SessionDetails {
            id: session.id,
            payment_status,
        })
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
