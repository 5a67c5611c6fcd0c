use std::fmt::Display;

use thiserror::Error;

use crate::{
    db_types::OrderId,
    oms_api::order_objects::PaginationError,
    traits::{OrderStoreError, RemoteCallError},
};

/// The remote collaborators the orchestrator talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteService {
    Catalog,
    Payments,
}

impl Display for RemoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteService::Catalog => write!(f, "product catalog"),
            RemoteService::Payments => write!(f, "payment service"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("The {service} is unavailable. {reason}")]
    RemoteUnavailable { service: RemoteService, reason: String },
    #[error(
        "Order {order_id} has been saved, but the payment service could not open a payment session. {reason}. The \
         order remains pending and a new payment session can be requested for it."
    )]
    PaymentSessionFailed { order_id: OrderId, reason: String },
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order {0} has already been paid")]
    OrderAlreadyPaid(OrderId),
    #[error("The following products do not exist in the catalog: {0:?}")]
    ProductsNotFound(Vec<i64>),
    #[error("Invalid order. {0}")]
    InvalidOrder(String),
    #[error("Invalid query. {0}")]
    InvalidQuery(#[from] PaginationError),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl OrderFlowError {
    pub fn remote(service: RemoteService, error: RemoteCallError) -> Self {
        OrderFlowError::RemoteUnavailable { service, reason: error.to_string() }
    }

    /// True for errors caused by a collaborator being down, slow or misbehaving.
    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, OrderFlowError::RemoteUnavailable { .. } | OrderFlowError::PaymentSessionFailed { .. })
    }
}

impl From<OrderStoreError> for OrderFlowError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::OrderNotFound(id) => OrderFlowError::OrderNotFound(id),
            e => OrderFlowError::DatabaseError(e.to_string()),
        }
    }
}
