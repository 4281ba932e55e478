//! # Store Traits
//!
//! Dependency-injected interfaces over the data store. The order service
//! never touches storage directly; it goes through `OrderStore` and
//! `ProductStore`, which makes the service testable with in-memory fakes
//! and keeps the real store (CMS database, SQL, ...) external.

use crate::error::OrderResult;
use crate::order::{NewOrder, Order, OrderPatch, OrderStatus};
use crate::product::Product;
use async_trait::async_trait;
use std::sync::Arc;

/// Exact-match filter over order fields. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub id: Option<String>,
    pub user: Option<String>,
    pub product: Option<String>,
    pub status: Option<OrderStatus>,
    pub checkout_session: Option<String>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: scope to an owning user
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Builder: match a specific order id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: match a product id
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Builder: match a status
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builder: match a checkout session id
    pub fn with_checkout_session(mut self, session: impl Into<String>) -> Self {
        self.checkout_session = Some(session.into());
        self
    }

    /// Whether an order satisfies every set field
    pub fn matches(&self, order: &Order) -> bool {
        self.id.as_ref().map_or(true, |id| *id == order.id)
            && self.user.as_ref().map_or(true, |u| *u == order.user)
            && self.product.as_ref().map_or(true, |p| *p == order.product)
            && self.status.map_or(true, |s| s == order.status)
            && self
                .checkout_session
                .as_ref()
                .map_or(true, |cs| *cs == order.checkout_session)
    }
}

/// Persistence interface for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders matching the filter
    async fn find(&self, filter: &OrderFilter) -> OrderResult<Vec<Order>>;

    /// Free-text search over an order's textual fields, merged with the
    /// exact filter
    async fn search(&self, filter: &OrderFilter, query: &str) -> OrderResult<Vec<Order>>;

    /// First order matching the filter, if any
    async fn find_one(&self, filter: &OrderFilter) -> OrderResult<Option<Order>>;

    /// Persist a new order. The store assigns the id and writes
    /// `status = unpaid`.
    async fn create(&self, order: NewOrder) -> OrderResult<Order>;

    /// Apply a patch to the first order matching the filter and return the
    /// updated record, or `None` if nothing matched
    async fn update(&self, filter: &OrderFilter, patch: OrderPatch) -> OrderResult<Option<Order>>;
}

/// Read-only interface over the product source.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Look up a product by id
    async fn find_one(&self, id: &str) -> OrderResult<Option<Product>>;
}

/// Type aliases for shared stores (dynamic dispatch)
pub type SharedOrderStore = Arc<dyn OrderStore>;
pub type SharedProductStore = Arc<dyn ProductStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order(id: &str, user: &str, status: OrderStatus) -> Order {
        Order {
            id: id.into(),
            user: user.into(),
            product: "p1".into(),
            total: 1999,
            status,
            checkout_session: format!("cs_{id}"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = OrderFilter::new();
        assert!(filter.matches(&order("o1", "u1", OrderStatus::Unpaid)));
        assert!(filter.matches(&order("o2", "u2", OrderStatus::Paid)));
    }

    #[test]
    fn test_user_scoping() {
        let filter = OrderFilter::new().with_user("u1");
        assert!(filter.matches(&order("o1", "u1", OrderStatus::Unpaid)));
        assert!(!filter.matches(&order("o2", "u2", OrderStatus::Unpaid)));
    }

    #[test]
    fn test_combined_fields() {
        let filter = OrderFilter::new()
            .with_user("u1")
            .with_status(OrderStatus::Paid);

        assert!(filter.matches(&order("o1", "u1", OrderStatus::Paid)));
        assert!(!filter.matches(&order("o2", "u1", OrderStatus::Unpaid)));
        assert!(!filter.matches(&order("o3", "u2", OrderStatus::Paid)));
    }

    #[test]
    fn test_checkout_session_lookup() {
        let filter = OrderFilter::new().with_checkout_session("cs_o1");
        assert!(filter.matches(&order("o1", "u1", OrderStatus::Unpaid)));
        assert!(!filter.matches(&order("o2", "u1", OrderStatus::Unpaid)));
    }
}
