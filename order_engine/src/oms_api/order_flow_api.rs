use std::{collections::HashMap, fmt::Debug, time::Duration};

use log::*;
use oms_common::DEFAULT_CURRENCY_CODE;

use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatusType, Product},
    events::{OrderPaidEvent, OrderPaidPublisher},
    helpers::{call_with_timeout, dedupe_product_ids},
    oms_api::{
        errors::{OrderFlowError, RemoteService},
        order_objects::{CreatedOrder, OrderPage, OrderQueryFilter, OrderWithProducts, PageMeta, Pagination},
        payment_objects::{PaymentSessionRequest, PaymentSucceeded},
        status_transitions::StatusTransition,
    },
    traits::{OrderManagement, PaymentSessions, ProductCatalog, SettlementResult},
};

pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`OrderFlowApi`]
#[derive(Debug, Clone)]
pub struct OrderFlowConfig {
    /// The longest the orchestrator will wait on the catalog or the payment service
    pub rpc_timeout: Duration,
    /// The currency code sent with every payment session request
    pub currency: String,
    /// When true, a catalog failure while enriching a fetched order fails the request. When false, the order is
    /// returned with empty product names.
    pub strict_enrichment: bool,
    /// When true, an order naming a product the catalog does not know is rejected. When false, such items are
    /// priced at zero.
    pub reject_unknown_products: bool,
}

impl Default for OrderFlowConfig {
    fn default() -> Self {
        Self {
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            strict_enrichment: false,
            reject_unknown_products: false,
        }
    }
}

/// `OrderFlowApi` drives the order lifecycle: placing orders against the catalog and payment service, reading them
/// back, moving them between statuses and settling them when the payment provider confirms a charge.
///
/// The store, catalog and payment capabilities are injected, so any backend implementing the traits in
/// [`crate::traits`] can be plugged in.
pub struct OrderFlowApi<B, C, P> {
    db: B,
    catalog: C,
    payments: P,
    config: OrderFlowConfig,
    order_paid: OrderPaidPublisher,
}

impl<B, C, P> Debug for OrderFlowApi<B, C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.config)
    }
}

impl<B, C, P> OrderFlowApi<B, C, P> {
    pub fn new(db: B, catalog: C, payments: P, config: OrderFlowConfig, order_paid: OrderPaidPublisher) -> Self {
        Self { db, catalog, payments, config, order_paid }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn config(&self) -> &OrderFlowConfig {
        &self.config
    }
}

impl<B, C, P> OrderFlowApi<B, C, P>
where
    B: OrderManagement,
    C: ProductCatalog,
    P: PaymentSessions,
{
    /// Places a new order.
    ///
    /// The steps run strictly in sequence:
    /// 1. The requested product ids are validated against the catalog.
    /// 2. Each item is priced with the catalog's current price, and the totals are computed. Products the catalog
    ///    does not return are priced at zero, unless `reject_unknown_products` is set.
    /// 3. The order and its items are stored in one atomic write, with status `PENDING`.
    /// 4. A payment session is requested for the stored order.
    ///
    /// If the catalog fails, nothing is stored. If only the payment session request fails, the order stays stored and
    /// pending, and [`OrderFlowError::PaymentSessionFailed`] names it so that [`Self::retry_payment_session`] can be
    /// used later.
    pub async fn create_order(&self, items: Vec<NewOrderItem>) -> Result<CreatedOrder, OrderFlowError> {
        validate_items(&items)?;
        let ids = dedupe_product_ids(items.iter().map(|i| i.product_id));
        trace!("🔄️📦️ Validating {} products with the catalog", ids.len());
        let products = self.validate_products(&ids).await?;
        let prices = products.iter().map(|p| (p.id, p.price)).collect::<HashMap<_, _>>();
        let missing = ids.iter().filter(|id| !prices.contains_key(id)).copied().collect::<Vec<i64>>();
        if !missing.is_empty() {
            if self.config.reject_unknown_products {
                debug!("🔄️📦️ Order rejected. Unknown products: {missing:?}");
                return Err(OrderFlowError::ProductsNotFound(missing));
            }
            warn!("🔄️📦️ The catalog does not know products {missing:?}. They will be priced at zero.");
        }
        let priced = items
            .iter()
            .map(|item| OrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price: prices.get(&item.product_id).copied().unwrap_or_default(),
            })
            .collect();
        let new_order = NewOrder::new(priced).map_err(|e| {
            debug!("🔄️📦️ Order rejected. {e}");
            OrderFlowError::InvalidOrder(e.to_string())
        })?;
        let stored = self.db.insert_order(new_order).await?;
        let order = OrderWithProducts::join(stored, &products);
        info!(
            "🔄️📦️ Order [{}] created. {} items for a total of {}",
            order.order.id, order.order.total_items, order.order.total_amount
        );
        let payment_session = self.open_payment_session(&order).await?;
        Ok(CreatedOrder { order, payment_session })
    }

    /// Requests a fresh payment session for an order that has not been paid yet.
    pub async fn retry_payment_session(&self, id: &OrderId) -> Result<CreatedOrder, OrderFlowError> {
        let order = self.fetch_order(id).await?;
        if order.order.paid {
            debug!("🔄️💳️ Payment session for [{id}] refused. The order is already paid.");
            return Err(OrderFlowError::OrderAlreadyPaid(id.clone()));
        }
        let payment_session = self.open_payment_session(&order).await?;
        Ok(CreatedOrder { order, payment_session })
    }

    /// Lists orders matching `filter`, one page at a time, oldest first.
    pub async fn fetch_orders(
        &self,
        filter: OrderQueryFilter,
        pagination: Pagination,
    ) -> Result<OrderPage, OrderFlowError> {
        pagination.validate()?;
        let total = self.db.count_orders(&filter).await?;
        let data = self.db.search_orders(&filter, &pagination).await?;
        let meta = PageMeta::new(total, &pagination);
        trace!("🔄️🔍️ {} of {total} orders returned for page {}. {filter}", data.len(), meta.page);
        Ok(OrderPage { data, meta })
    }

    /// Fetches an order with its items, with product names looked up from the catalog.
    pub async fn fetch_order(&self, id: &OrderId) -> Result<OrderWithProducts, OrderFlowError> {
        let order =
            self.db.fetch_order_with_items(id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(id.clone()))?;
        let ids = dedupe_product_ids(order.items.iter().map(|i| i.product_id));
        match self.validate_products(&ids).await {
            Ok(products) => Ok(OrderWithProducts::join(order, &products)),
            Err(e) if self.config.strict_enrichment => Err(e),
            Err(e) => {
                warn!("🔄️🔍️ Could not look up product names for order [{id}]. Returning it without names. {e}");
                Ok(OrderWithProducts::without_names(order))
            },
        }
    }

    /// Moves an order to `status`. Asking for the status the order already has changes nothing.
    ///
    /// This does not settle an order. Setting `PAID` here leaves `paid` and `paid_at` untouched.
    pub async fn change_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, OrderFlowError> {
        let order = self.db.fetch_order(id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(id.clone()))?;
        match StatusTransition::evaluate(order.status, status) {
            StatusTransition::NoOp => {
                debug!("🔄️🏷️ Order [{id}] is already {status}. Nothing to do.");
                Ok(order)
            },
            StatusTransition::Apply { from, to } => {
                let updated = self.db.update_order_status(id, to).await?;
                info!("🔄️🏷️ Order [{id}] status changed from {from} to {to}");
                Ok(updated)
            },
        }
    }

    /// Applies a payment confirmation to its order.
    ///
    /// Confirmations are delivered at least once, so this is idempotent: the first delivery marks the order as paid and
    /// writes its receipt. Later deliveries for the same order change nothing. Order-paid listeners hear only the first.
    pub async fn process_payment_succeeded(
        &self,
        payment: PaymentSucceeded,
    ) -> Result<SettlementResult, OrderFlowError> {
        let id = &payment.order_id;
        trace!("🔄️💰️ Settling order [{id}] with charge {}", payment.stripe_payment_id);
        let result = self.db.settle_order(id, &payment.stripe_payment_id, &payment.receipt_url).await?;
        if result.newly_settled {
            info!("🔄️💰️ Order [{id}] has been paid. Charge: {}", payment.stripe_payment_id);
            self.notify_order_paid(&result).await;
        } else {
            info!(
                "🔄️💰️ Duplicate payment confirmation for order [{id}] (charge {}). The order was already settled.",
                payment.stripe_payment_id
            );
        }
        Ok(result)
    }

    async fn notify_order_paid(&self, settled: &SettlementResult) {
        if self.order_paid.listener_count() == 0 {
            return;
        }
        debug!("🔄️💰️ Notifying {} order paid listener(s)", self.order_paid.listener_count());
        let event = OrderPaidEvent::new(settled.order.clone(), settled.receipt.clone());
        self.order_paid.publish(event).await;
    }

    async fn validate_products(&self, ids: &[i64]) -> Result<Vec<Product>, OrderFlowError> {
        call_with_timeout(self.config.rpc_timeout, self.catalog.validate_products(ids))
            .await
            .map_err(|e| OrderFlowError::remote(RemoteService::Catalog, e))
    }

    async fn open_payment_session(&self, order: &OrderWithProducts) -> Result<serde_json::Value, OrderFlowError> {
        let request = PaymentSessionRequest::for_order(order, &self.config.currency);
        let id = &order.order.id;
        match call_with_timeout(self.config.rpc_timeout, self.payments.create_payment_session(request)).await {
            Ok(session) => {
                debug!("🔄️💳️ Payment session opened for order [{id}]");
                Ok(session)
            },
            Err(e) => {
                warn!("🔄️💳️ Order [{id}] is stored but no payment session could be opened. It remains pending. {e}");
                Err(OrderFlowError::PaymentSessionFailed { order_id: id.clone(), reason: e.to_string() })
            },
        }
    }
}

fn validate_items(items: &[NewOrderItem]) -> Result<(), OrderFlowError> {
    if items.is_empty() {
        return Err(OrderFlowError::InvalidOrder("An order must contain at least one item".into()));
    }
    if let Some(item) = items.iter().find(|i| i.product_id <= 0) {
        return Err(OrderFlowError::InvalidOrder(format!("Invalid product id: {}", item.product_id)));
    }
    if let Some(item) = items.iter().find(|i| i.quantity <= 0) {
        return Err(OrderFlowError::InvalidOrder(format!(
            "Quantity for product {} must be positive, got {}",
            item.product_id, item.quantity
        )));
    }
    Ok(())
}
