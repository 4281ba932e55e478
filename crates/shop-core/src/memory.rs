//! # In-Memory Stores
//!
//! `OrderStore`/`ProductStore` implementations backed by process memory.
//! Used as the default wiring of the binary and as fakes in tests; a real
//! deployment substitutes a database-backed implementation behind the
//! same traits.

use crate::error::{OrderError, OrderResult};
use crate::order::{NewOrder, Order, OrderPatch, OrderStatus};
use crate::product::{Product, ProductCatalog};
use crate::store::{OrderFilter, OrderStore, ProductStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory order store. Lock is never held across an await point.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> OrderError {
        OrderError::Store("order store lock poisoned".to_string())
    }

    /// Case-insensitive substring match over the textual fields of an
    /// order. Mirrors what the external store's search capability does.
    fn text_matches(order: &Order, query: &str) -> bool {
        let needle = query.to_lowercase();
        order.id.to_lowercase().contains(&needle)
            || order.product.to_lowercase().contains(&needle)
            || order.checkout_session.to_lowercase().contains(&needle)
            || order.status.to_string().contains(&needle)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find(&self, filter: &OrderFilter) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().map_err(|_| Self::lock_poisoned())?;
        Ok(orders.iter().filter(|o| filter.matches(o)).cloned().collect())
    }

    async fn search(&self, filter: &OrderFilter, query: &str) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().map_err(|_| Self::lock_poisoned())?;
        Ok(orders
            .iter()
            .filter(|o| filter.matches(o) && Self::text_matches(o, query))
            .cloned()
            .collect())
    }

    async fn find_one(&self, filter: &OrderFilter) -> OrderResult<Option<Order>> {
        let orders = self.orders.read().map_err(|_| Self::lock_poisoned())?;
        Ok(orders.iter().find(|o| filter.matches(o)).cloned())
    }

    async fn create(&self, order: NewOrder) -> OrderResult<Order> {
        let now = Utc::now();
        let record = Order {
            id: Uuid::new_v4().to_string(),
            user: order.user,
            product: order.product,
            total: order.total,
            status: OrderStatus::Unpaid,
            checkout_session: order.checkout_session,
            created_at: now,
            updated_at: now,
        };

        let mut orders = self.orders.write().map_err(|_| Self::lock_poisoned())?;
        orders.push(record.clone());
        Ok(record)
    }

    async fn update(&self, filter: &OrderFilter, patch: OrderPatch) -> OrderResult<Option<Order>> {
        let mut orders = self.orders.write().map_err(|_| Self::lock_poisoned())?;

        let Some(order) = orders.iter_mut().find(|o| filter.matches(o)) else {
            return Ok(None);
        };

        if let Some(status) = patch.status {
            order.status = status;
        }
        order.updated_at = Utc::now();

        Ok(Some(order.clone()))
    }
}

/// In-memory product source, typically seeded from `config/products.toml`.
#[derive(Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<String, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a loaded catalog
    pub fn from_catalog(catalog: ProductCatalog) -> Self {
        let products = catalog
            .products
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
        Self {
            products: RwLock::new(products),
        }
    }

    /// Insert or replace a product
    pub fn insert(&self, product: Product) -> OrderResult<()> {
        let mut products = self
            .products
            .write()
            .map_err(|_| OrderError::Store("product store lock poisoned".to_string()))?;
        products.insert(product.id.clone(), product);
        Ok(())
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_one(&self, id: &str) -> OrderResult<Option<Product>> {
        let products = self
            .products
            .read()
            .map_err(|_| OrderError::Store("product store lock poisoned".to_string()))?;
        // Inactive products are not purchasable, treat them as absent.
        Ok(products.get(id).filter(|p| p.active).cloned())
    }
}
