//! Clients for the services the order management service depends on.
//!
//! * [`CatalogClient`] asks the product catalog which products exist and what they currently cost.
//! * [`PaymentsClient`] asks the payment service to open a checkout session for an order.
//!
//! Both are thin wrappers over a shared JSON-over-HTTP [`RestClient`]. They know nothing about orders beyond the
//! payloads in [`data_objects`].
mod catalog;
mod config;
mod error;
mod payments;
mod rest;

pub mod data_objects;

pub use catalog::CatalogClient;
pub use config::{CatalogConfig, PaymentsConfig};
pub use error::ServiceClientError;
pub use payments::PaymentsClient;
pub use rest::RestClient;
