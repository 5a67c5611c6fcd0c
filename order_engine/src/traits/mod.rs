//! # Backend and collaborator contracts
//!
//! The order engine is agnostic of where orders are kept and of how the product catalog and payment provider are
//! reached. This module defines those seams.
//!
//! * [`OrderManagement`] defines the behaviour a storage backend must provide. Every multi-row write (placing an
//!   order with its items, settling an order with its receipt) is atomic.
//! * [`ProductCatalog`] validates product ids and reports their current names and prices.
//! * [`PaymentSessions`] opens a payment session for an order with the payment provider.
mod order_management;
mod payment_sessions;
mod product_catalog;

use thiserror::Error;

pub use order_management::{OrderManagement, OrderStoreError, SettlementResult};
pub use payment_sessions::PaymentSessions;
pub use product_catalog::ProductCatalog;

/// Errors reported by the remote collaborators of the order engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteCallError {
    #[error("The remote service could not be reached. {0}")]
    Unreachable(String),
    #[error("The remote service did not respond in time")]
    Timeout,
    #[error("The remote service rejected the request. {0}")]
    Rejected(String),
    #[error("The remote service sent a response that could not be understood. {0}")]
    InvalidResponse(String),
}
