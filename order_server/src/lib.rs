//! # Order management server
//!
//! The HTTP front door of the order management service. Requests are decoded and validated here, then handed to the
//! [`order_engine::OrderFlowApi`], which does the real work.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET /health`: Returns 200 OK.
//! * `POST /orders`: Places an order and opens a payment session for it.
//! * `GET /orders`: Lists orders, oldest first. Accepts `status`, `page` and `limit` query parameters.
//! * `GET /orders/{order_id}`: Fetches an order with its items and product names.
//! * `PATCH /orders/{order_id}/status`: Changes the status of an order.
//! * `POST /orders/{order_id}/payment_session`: Opens a new payment session for an unpaid order.
//! * `POST /events/payment_succeeded`: Queues a payment confirmation from the payment provider. Returns 202.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
