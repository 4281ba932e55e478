//! # Order Error Types
//!
//! Typed error handling for the shopfront order service.
//! All order operations return `Result<T, OrderError>`.

use thiserror::Error;

/// Core error type for all order operations
#[derive(Debug, Error)]
pub enum OrderError {
    /// Request did not name a product to purchase
    #[error("Please specify a product")]
    MissingProduct,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product does not exist (or is not purchasable)
    #[error("No product with such id: {product_id}")]
    ProductNotFound { product_id: String },

    /// Order does not exist, or is not owned by the caller
    #[error("Order not found")]
    OrderNotFound,

    /// Provider reports the session has not been paid
    #[error("The payment wasn't successful, please call support")]
    PaymentIncomplete { session_id: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with the provider
    #[error("Network error: {0}")]
    Network(String),

    /// Data store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OrderError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderError::Network(_) | OrderError::Provider { .. })
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            OrderError::MissingProduct => 400,
            OrderError::InvalidRequest(_) => 400,
            OrderError::ProductNotFound { .. } => 404,
            OrderError::OrderNotFound => 404,
            OrderError::PaymentIncomplete { .. } => 400,
            OrderError::Provider { .. } => 502,
            OrderError::Network(_) => 503,
            OrderError::Store(_) => 500,
            OrderError::Configuration(_) => 500,
            OrderError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for order operations
pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(OrderError::Network("timeout".into()).is_retryable());
        assert!(OrderError::Provider {
            provider: "stripe".into(),
            message: "rate limited".into()
        }
        .is_retryable());
        assert!(!OrderError::MissingProduct.is_retryable());
        assert!(!OrderError::OrderNotFound.is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(OrderError::MissingProduct.status_code(), 400);
        assert_eq!(
            OrderError::ProductNotFound {
                product_id: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(OrderError::OrderNotFound.status_code(), 404);
        assert_eq!(
            OrderError::PaymentIncomplete {
                session_id: "cs_test_1".into()
            }
            .status_code(),
            400
        );
        assert_eq!(OrderError::Network("down".into()).status_code(), 503);
    }

    #[test]
    fn test_payment_incomplete_message_mentions_support() {
        let err = OrderError::PaymentIncomplete {
            session_id: "cs_test_1".into(),
        };
        assert!(err.to_string().contains("call support"));
    }
}
