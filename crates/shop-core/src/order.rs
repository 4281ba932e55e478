//! # Order Types
//!
//! The `Order` record, its two-value status flag, and the sanitized
//! transport view returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment status of an order.
///
/// The only transition is `Unpaid -> Paid`, applied when a confirmed
/// checkout session is observed. It is never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting payment
    Unpaid,
    /// Payment confirmed by the provider
    Paid,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Unpaid
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Unpaid => write!(f, "unpaid"),
            OrderStatus::Paid => write!(f, "paid"),
        }
    }
}

/// A stored order record, one purchase attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique id, assigned by the store
    pub id: String,

    /// Owning account id; every read is scoped to this field
    pub user: String,

    /// Purchased product id
    pub product: String,

    /// Amount in smallest currency unit (cents for USD)
    pub total: i64,

    /// Payment status
    pub status: OrderStatus,

    /// Provider checkout session id correlating this order
    pub checkout_session: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Last-updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Strip internal-only fields for transport to the caller.
    pub fn sanitize(&self) -> OrderView {
        OrderView {
            id: self.id.clone(),
            product: self.product.clone(),
            total: self.total,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Sanitized order representation returned over HTTP.
///
/// `user` and `checkout_session` are internal-only and never leave the
/// service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: String,
    pub product: String,
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an order.
///
/// There is intentionally no `status` field: the store always writes new
/// orders as `unpaid`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user: String,
    pub product: String,
    pub total: i64,
    pub checkout_session: String,
}

/// Patch applied by `update`. Only the status flag is mutable.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
}

impl OrderPatch {
    /// Patch that marks an order paid
    pub fn paid() -> Self {
        Self {
            status: Some(OrderStatus::Paid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            id: "ord_1".into(),
            user: "u1".into(),
            product: "p1".into(),
            total: 1999,
            status: OrderStatus::Unpaid,
            checkout_session: "cs_test_1".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Unpaid).unwrap(),
            "\"unpaid\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"paid\"").unwrap(),
            OrderStatus::Paid
        );
    }

    #[test]
    fn test_sanitize_strips_internal_fields() {
        let order = sample_order();
        let view = order.sanitize();

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "ord_1");
        assert_eq!(json["total"], 1999);
        assert_eq!(json["status"], "unpaid");
        assert!(json.get("user").is_none());
        assert!(json.get("checkout_session").is_none());
    }

    #[test]
    fn test_paid_patch() {
        let patch = OrderPatch::paid();
        assert_eq!(patch.status, Some(OrderStatus::Paid));
    }
}
