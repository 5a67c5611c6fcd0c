//! # Order engine public API
//!
//! * [`order_flow_api`] is the orchestrator. It places orders, lists and fetches them, changes their status and
//!   settles them when a payment confirmation arrives.
//! * [`status_transitions`] decides what a requested status change amounts to.
//! * [`order_objects`] holds the pagination helper and the query and result types.
//! * [`payment_objects`] holds the messages exchanged with the payment provider.
//!
//! # API usage
//!
//! An API instance is created by supplying a storage backend and the two collaborators:
//!
//! ```rust,ignore
//! use order_engine::{events::OrderPaidPublisher, OrderFlowApi, OrderFlowConfig, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/orders.db", 5).await?;
//! db.migrate().await?;
//! let api = OrderFlowApi::new(db, catalog, payments, OrderFlowConfig::default(), OrderPaidPublisher::default());
//! let placed = api.create_order(vec![NewOrderItem::new(1, 2)]).await?;
//! ```
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
pub mod payment_objects;
pub mod status_transitions;
