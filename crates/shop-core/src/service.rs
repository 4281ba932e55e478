//! # Order Service
//!
//! Orchestrates order creation and payment confirmation against the
//! injected store and payment provider. All reads are scoped to the
//! calling user; the only mutation is the `unpaid -> paid` status flip.

use crate::error::{OrderError, OrderResult};
use crate::order::{NewOrder, OrderPatch, OrderStatus, OrderView};
use crate::product::Currency;
use crate::provider::{CheckoutRequest, SharedPaymentProvider};
use crate::store::{OrderFilter, SharedOrderStore, SharedProductStore};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Fallback redirect base when the caller sends no Origin header
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// The authenticated caller, extracted upstream and passed explicitly.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Account id; all order reads are scoped to it
    pub id: String,
    /// Email, used to prefill the hosted checkout page
    pub email: Option<String>,
}

impl Caller {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Caller-supplied list parameters. A present `q` switches the lookup to
/// the store's free-text search.
///
/// Only the fields named here are filterable; unknown query parameters
/// are ignored rather than rejected or passed through to the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Free-text search term
    #[serde(rename = "_q")]
    pub q: Option<String>,
    /// Exact status filter
    pub status: Option<OrderStatus>,
    /// Exact product filter
    pub product: Option<String>,
}

/// Reference to the product being purchased
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRef {
    pub id: String,
}

/// Result of `create`: the caller redirects to the provider's hosted page
/// using this session id.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedCheckout {
    /// Provider checkout session id
    pub id: String,
}

/// The order service. Collaborators are injected so tests can substitute
/// in-memory fakes.
pub struct OrderService {
    orders: SharedOrderStore,
    products: SharedProductStore,
    payments: SharedPaymentProvider,
}

impl OrderService {
    pub fn new(
        orders: SharedOrderStore,
        products: SharedProductStore,
        payments: SharedPaymentProvider,
    ) -> Self {
        Self {
            orders,
            products,
            payments,
        }
    }

    /// List the caller's orders, sanitized. The user scope is merged over
    /// whatever filters the caller supplied and cannot be overridden.
    #[instrument(skip(self, params), fields(user = %caller.id))]
    pub async fn list(&self, caller: &Caller, params: ListParams) -> OrderResult<Vec<OrderView>> {
        let mut filter = OrderFilter::new().with_user(&caller.id);
        if let Some(status) = params.status {
            filter = filter.with_status(status);
        }
        if let Some(product) = params.product {
            filter = filter.with_product(product);
        }

        let orders = match params.q.as_deref() {
            Some(query) => self.orders.search(&filter, query).await?,
            None => self.orders.find(&filter).await?,
        };

        Ok(orders.iter().map(|o| o.sanitize()).collect())
    }

    /// Fetch one order, scoped to the caller. An order owned by someone
    /// else is indistinguishable from a missing one.
    #[instrument(skip(self), fields(user = %caller.id))]
    pub async fn get_one(&self, id: &str, caller: &Caller) -> OrderResult<OrderView> {
        let filter = OrderFilter::new().with_id(id).with_user(&caller.id);
        let order = self
            .orders
            .find_one(&filter)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        Ok(order.sanitize())
    }

    /// Initiate checkout: validate the product, create a hosted session at
    /// the provider, persist the unpaid order, and hand back the session id.
    ///
    /// The two external calls are sequential and non-transactional: a store
    /// failure after the session is created leaves an orphaned provider
    /// session behind.
    #[instrument(skip(self, product, origin), fields(user = %caller.id))]
    pub async fn create(
        &self,
        product: Option<ProductRef>,
        caller: &Caller,
        origin: Option<&str>,
    ) -> OrderResult<CreatedCheckout> {
        let product_ref = product.ok_or(OrderError::MissingProduct)?;

        let real_product = self
            .products
            .find_one(&product_ref.id)
            .await?
            .ok_or(OrderError::ProductNotFound {
                product_id: product_ref.id.clone(),
            })?;

        // The Origin header is client-supplied and trusted as the redirect
        // base. Known trust-boundary concern, kept intentionally.
        let base_url = origin.unwrap_or(DEFAULT_BASE_URL);

        let request = CheckoutRequest {
            product_name: real_product.name.clone(),
            unit_amount: real_product.price,
            currency: Currency::USD,
            quantity: 1,
            customer_email: caller.email.clone(),
            success_url: format!("{base_url}/success?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: base_url.to_string(),
        };

        let session = self.payments.create_checkout_session(&request).await?;

        info!(
            session_id = %session.id,
            product = %real_product.id,
            total = real_product.price,
            "created checkout session"
        );

        self.orders
            .create(NewOrder {
                user: caller.id.clone(),
                product: real_product.id,
                total: real_product.price,
                checkout_session: session.id.clone(),
            })
            .await?;

        Ok(CreatedCheckout { id: session.id })
    }

    /// Finalize payment for a checkout session. Looks the order up by its
    /// `checkout_session` field, not by order id. Re-confirming an
    /// already-paid session re-applies the same write and succeeds.
    #[instrument(skip(self))]
    pub async fn confirm(&self, checkout_session: &str) -> OrderResult<OrderView> {
        let session = self.payments.retrieve_session(checkout_session).await?;

        if !session.payment_status.is_paid() {
            warn!(session_id = %checkout_session, "payment not completed");
            return Err(OrderError::PaymentIncomplete {
                session_id: checkout_session.to_string(),
            });
        }

        let filter = OrderFilter::new().with_checkout_session(checkout_session);
        let updated = self
            .orders
            .update(&filter, OrderPatch::paid())
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        info!(order_id = %updated.id, "order marked paid");

        Ok(updated.sanitize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderError;
    use crate::memory::{InMemoryOrderStore, InMemoryProductStore};
    use crate::product::Product;
    use crate::provider::{
        CheckoutSession, PaymentProvider, PaymentStatus, SessionDetails,
    };
    use crate::store::OrderStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Fake provider that records created sessions and serves a scripted
    /// payment status on retrieval.
    struct FakeProvider {
        created: Mutex<Vec<CheckoutRequest>>,
        create_calls: AtomicUsize,
        payment_status: Mutex<PaymentStatus>,
        next_session_id: String,
    }

    impl FakeProvider {
        fn new(session_id: &str) -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                create_calls: AtomicUsize::new(0),
                payment_status: Mutex::new(PaymentStatus::Unpaid),
                next_session_id: session_id.to_string(),
            }
        }

        fn mark_paid(&self) {
            *self.payment_status.lock().unwrap() = PaymentStatus::Paid;
        }

        fn create_calls(&self) -> usize {
            self.create_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentProvider for FakeProvider {
        async fn create_checkout_session(
            &self,
            request: &CheckoutRequest,
        ) -> OrderResult<CheckoutSession> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.created.lock().unwrap().push(request.clone());
            Ok(CheckoutSession {
                id: self.next_session_id.clone(),
                url: format!("https://pay.example.com/c/{}", self.next_session_id),
            })
        }

        async fn retrieve_session(&self, session_id: &str) -> OrderResult<SessionDetails> {
            Ok(SessionDetails {
                id: session_id.to_string(),
                payment_status: self.payment_status.lock().unwrap().clone(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "fake"
        }
    }

    struct Fixture {
        service: OrderService,
        orders: Arc<InMemoryOrderStore>,
        provider: Arc<FakeProvider>,
    }

    fn fixture() -> Fixture {
        let orders = Arc::new(InMemoryOrderStore::new());
        let products = Arc::new(InMemoryProductStore::new());
        products.insert(Product::new("p1", "Widget", 1999)).unwrap();
        let provider = Arc::new(FakeProvider::new("cs_test_1"));

        let service = OrderService::new(
            orders.clone(),
            products,
            provider.clone(),
        );

        Fixture {
            service,
            orders,
            provider,
        }
    }

    fn widget_ref() -> Option<ProductRef> {
        Some(ProductRef { id: "p1".into() })
    }

    #[tokio::test]
    async fn test_create_without_product_fails_before_any_call() {
        let fx = fixture();
        let caller = Caller::new("u1");

        let err = fx.service.create(None, &caller, None).await.unwrap_err();
        assert!(matches!(err, OrderError::MissingProduct));
        assert_eq!(fx.provider.create_calls(), 0);
        assert!(fx
            .orders
            .find(&OrderFilter::new())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unknown_product_fails_before_provider() {
        let fx = fixture();
        let caller = Caller::new("u1");

        let err = fx
            .service
            .create(Some(ProductRef { id: "nope".into() }), &caller, None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound { .. }));
        assert_eq!(fx.provider.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_persists_unpaid_order_with_session_id() {
        let fx = fixture();
        let caller = Caller::new("u1").with_email("u1@example.com");

        let created = fx
            .service
            .create(widget_ref(), &caller, Some("https://shop.example.com"))
            .await
            .unwrap();
        assert_eq!(created.id, "cs_test_1");

        let orders = fx.orders.find(&OrderFilter::new()).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].user, "u1");
        assert_eq!(orders[0].product, "p1");
        assert_eq!(orders[0].total, 1999);
        assert_eq!(orders[0].status, OrderStatus::Unpaid);
        assert_eq!(orders[0].checkout_session, "cs_test_1");

        let requests = fx.provider.created.lock().unwrap();
        assert_eq!(requests[0].unit_amount, 1999);
        assert_eq!(requests[0].currency.as_str(), "usd");
        assert_eq!(requests[0].quantity, 1);
        assert_eq!(requests[0].customer_email.as_deref(), Some("u1@example.com"));
        assert_eq!(
            requests[0].success_url,
            "https://shop.example.com/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(requests[0].cancel_url, "https://shop.example.com");
    }

    #[tokio::test]
    async fn test_create_falls_back_to_local_base_url() {
        let fx = fixture();
        let caller = Caller::new("u1");

        fx.service.create(widget_ref(), &caller, None).await.unwrap();

        let requests = fx.provider.created.lock().unwrap();
        assert!(requests[0]
            .success_url
            .starts_with("http://localhost:3000/success"));
        assert_eq!(requests[0].cancel_url, "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_confirm_incomplete_payment_mutates_nothing() {
        let fx = fixture();
        let caller = Caller::new("u1");
        fx.service.create(widget_ref(), &caller, None).await.unwrap();

        let err = fx.service.confirm("cs_test_1").await.unwrap_err();
        assert!(matches!(err, OrderError::PaymentIncomplete { .. }));

        let orders = fx.orders.find(&OrderFilter::new()).await.unwrap();
        assert_eq!(orders[0].status, OrderStatus::Unpaid);
    }

    #[tokio::test]
    async fn test_confirm_paid_session_flips_status_and_is_idempotent() {
        let fx = fixture();
        let caller = Caller::new("u1");
        fx.service.create(widget_ref(), &caller, None).await.unwrap();
        fx.provider.mark_paid();

        let view = fx.service.confirm("cs_test_1").await.unwrap();
        assert_eq!(view.status, OrderStatus::Paid);
        assert_eq!(view.total, 1999);

        // Second confirmation re-applies the same write, no error.
        let again = fx.service.confirm("cs_test_1").await.unwrap();
        assert_eq!(again.status, OrderStatus::Paid);

        let orders = fx.orders.find(&OrderFilter::new()).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_confirm_with_no_matching_order_is_not_found() {
        let fx = fixture();
        fx.provider.mark_paid();

        let err = fx.service.confirm("cs_unknown").await.unwrap_err();
        assert!(matches!(err, OrderError::OrderNotFound));
    }

    #[tokio::test]
    async fn test_list_and_get_one_never_cross_users() {
        let fx = fixture();
        let alice = Caller::new("alice");
        let bob = Caller::new("bob");
        fx.service.create(widget_ref(), &alice, None).await.unwrap();

        assert!(fx.service.list(&bob, ListParams::default()).await.unwrap().is_empty());
        let mine = fx.service.list(&alice, ListParams::default()).await.unwrap();
        assert_eq!(mine.len(), 1);

        let err = fx
            .service
            .get_one(&mine[0].id, &bob)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::OrderNotFound));
        assert!(fx.service.get_one(&mine[0].id, &alice).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_uses_search_when_query_present() {
        let fx = fixture();
        let caller = Caller::new("u1");
        fx.service.create(widget_ref(), &caller, None).await.unwrap();

        let params = ListParams {
            q: Some("cs_test".into()),
            ..Default::default()
        };
        assert_eq!(fx.service.list(&caller, params).await.unwrap().len(), 1);

        let params = ListParams {
            q: Some("no-such-term".into()),
            ..Default::default()
        };
        assert!(fx.service.list(&caller, params).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_status_filter() {
        let fx = fixture();
        let caller = Caller::new("u1");
        fx.service.create(widget_ref(), &caller, None).await.unwrap();
        fx.provider.mark_paid();
        fx.service.confirm("cs_test_1").await.unwrap();

        let params = ListParams {
            status: Some(OrderStatus::Paid),
            ..Default::default()
        };
        assert_eq!(fx.service.list(&caller, params).await.unwrap().len(), 1);

        let params = ListParams {
            status: Some(OrderStatus::Unpaid),
            ..Default::default()
        };
        assert!(fx.service.list(&caller, params).await.unwrap().is_empty());
    }
}
