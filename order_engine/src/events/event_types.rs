use chrono::{DateTime, Utc};

use crate::{
    db_types::{Order, OrderReceipt},
    oms_api::payment_objects::PaymentSucceeded,
};

/// A payment confirmation received from the payment provider, waiting to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSucceededEvent {
    pub payment: PaymentSucceeded,
    pub received_at: DateTime<Utc>,
}

impl PaymentSucceededEvent {
    pub fn new(payment: PaymentSucceeded) -> Self {
        Self { payment, received_at: Utc::now() }
    }
}

/// Emitted once per order, when a payment confirmation settles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPaidEvent {
    pub order: Order,
    pub receipt: OrderReceipt,
}

impl OrderPaidEvent {
    pub fn new(order: Order, receipt: OrderReceipt) -> Self {
        Self { order, receipt }
    }
}
