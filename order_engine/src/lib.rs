//! Order Engine
//!
//! The order engine coordinates the life of an order across three parties: the product catalog, which prices the
//! items; the order store, which keeps orders, line items and receipts; and the payment provider, which opens payment
//! sessions and later confirms charges.
//!
//! The library is divided into these sections:
//! 1. Storage ([`mod@sqlite`]). SQLite is the supported backend. You should never need to access the database directly.
//!    Use the public API instead. The data types used in the database are defined in [`mod@db_types`] and are public.
//! 2. Contracts ([`mod@traits`]). The store, catalog and payment provider are reached through traits, so that the
//!    orchestrator can be wired to real services, or to mocks in tests.
//! 3. The public API ([`OrderFlowApi`]). It drives order creation, retrieval, status changes and settlement.
//!
//! The engine also routes events. Payment confirmations are queued for a settlement handler, and when an order is
//! settled an [`events::OrderPaidEvent`] is published to every listener registered with [`events::OrderEvents`].
pub mod db_types;
pub mod events;
pub mod helpers;
mod oms_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use oms_api::{
    errors::{OrderFlowError, RemoteService},
    order_flow_api::{OrderFlowApi, OrderFlowConfig, DEFAULT_RPC_TIMEOUT},
    order_objects,
    payment_objects,
    status_transitions::StatusTransition,
};
pub use traits::{OrderManagement, OrderStoreError, PaymentSessions, ProductCatalog, RemoteCallError, SettlementResult};
