use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Money, OrderId},
    oms_api::order_objects::OrderWithProducts,
};

/// A line of the checkout shown to the customer by the payment provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSessionItem {
    pub name: String,
    pub price: Money,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    pub order_id: OrderId,
    pub currency: String,
    pub items: Vec<PaymentSessionItem>,
}

impl PaymentSessionRequest {
    /// Derives the session request from an enriched order. Prices are the snapshot prices stored with the order.
    pub fn for_order(order: &OrderWithProducts, currency: &str) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| PaymentSessionItem { name: item.name.clone(), price: item.price, quantity: item.quantity })
            .collect();
        Self { order_id: order.order.id.clone(), currency: currency.to_string(), items }
    }
}

/// The settlement notice sent by the payment provider once a charge has gone through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    pub order_id: OrderId,
    /// The provider's charge reference
    pub stripe_payment_id: String,
    pub receipt_url: String,
}

impl PaymentSucceeded {
    pub fn new<S: Into<String>>(order_id: OrderId, stripe_payment_id: S, receipt_url: S) -> Self {
        Self { order_id, stripe_payment_id: stripe_payment_id.into(), receipt_url: receipt_url.into() }
    }
}
