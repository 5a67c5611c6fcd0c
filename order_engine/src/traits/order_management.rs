use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderReceipt, OrderStatusType, OrderWithItems},
    oms_api::order_objects::{OrderQueryFilter, Pagination},
};

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Cannot insert order, since it already exists with id {0}")]
    OrderAlreadyExists(OrderId),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}

/// The outcome of a settlement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementResult {
    /// The order, as it stands after the attempt
    pub order: Order,
    /// The single receipt attached to the order
    pub receipt: OrderReceipt,
    /// False if the order had already been settled by an earlier (or concurrent) delivery of the same event
    pub newly_settled: bool,
}

/// Storage behaviour required by the order engine.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores the order together with all of its items in a single atomic transaction. Either everything is written,
    /// or nothing is.
    async fn insert_order(&self, order: NewOrder) -> Result<OrderWithItems, OrderStoreError>;

    /// Fetches the order header, without its items.
    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Fetches the order along with its stored line items.
    async fn fetch_order_with_items(&self, id: &OrderId) -> Result<Option<OrderWithItems>, OrderStoreError>;

    /// Returns one page of orders matching `filter`, oldest first.
    async fn search_orders(
        &self,
        filter: &OrderQueryFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Order>, OrderStoreError>;

    /// The number of orders matching `filter`, ignoring pagination.
    async fn count_orders(&self, filter: &OrderQueryFilter) -> Result<i64, OrderStoreError>;

    /// Overwrites the status of the order. Returns `OrderNotFound` if there is no such order.
    async fn update_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, OrderStoreError>;

    /// Marks the order as paid and attaches a receipt, atomically.
    ///
    /// Settlement happens at most once per order. If the order is already paid, the stored order and its existing
    /// receipt are returned and `newly_settled` is false. The charge reference and receipt url of later attempts are
    /// discarded.
    async fn settle_order(
        &self,
        id: &OrderId,
        charge_id: &str,
        receipt_url: &str,
    ) -> Result<SettlementResult, OrderStoreError>;

    /// Fetches the receipt for the order, if it has been settled.
    async fn fetch_receipt(&self, id: &OrderId) -> Result<Option<OrderReceipt>, OrderStoreError>;
}
