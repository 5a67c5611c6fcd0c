use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use oms_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use uuid::Uuid;

//--------------------------------------        OrderId        ---------------------------------------------------------
/// The unique identifier of an order. Always a lower-case, hyphenated UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

#[derive(Debug, Clone, Error)]
#[error("{0} is not a valid order id. Order ids are UUIDs.")]
pub struct OrderIdError(String);

impl OrderId {
    /// Generates a fresh, random order id.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = OrderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Uuid::parse_str(s.trim()).map_err(|_| OrderIdError(s.to_string()))?;
        Ok(Self(id.hyphenated().to_string()))
    }
}

impl TryFrom<String> for OrderId {
    type Error = OrderIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderId> for String {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatusType {
    /// The order has been created and is awaiting payment.
    #[default]
    Pending,
    /// The order has been cancelled by the customer or an admin.
    Cancelled,
    /// The order has been delivered to the customer.
    Delivered,
    /// The order has been paid for.
    Paid,
}

impl OrderStatusType {
    pub const ALL: [OrderStatusType; 4] = [Self::Pending, Self::Cancelled, Self::Delivered, Self::Paid];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatusType::Pending => "PENDING",
            OrderStatusType::Cancelled => "CANCELLED",
            OrderStatusType::Delivered => "DELIVERED",
            OrderStatusType::Paid => "PAID",
        }
    }

    /// A comma-separated list of every valid status, for use in error messages.
    pub fn valid_values() -> String {
        Self::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}. Valid values are: {valid}", valid = OrderStatusType::valid_values())]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CANCELLED" => Ok(Self::Cancelled),
            "DELIVERED" => Ok(Self::Delivered),
            "PAID" => Ok(Self::Paid),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Sum of `price × quantity` over the items, using the prices captured at creation time
    pub total_amount: Money,
    /// Sum of the item quantities
    pub total_items: i64,
    pub status: OrderStatusType,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    /// The payment provider's charge reference. Only set on settlement.
    pub stripe_charge_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      OrderItem        ---------------------------------------------------------
/// A line item, as stored. `price` is the catalog price snapshot taken when the order was created.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

//--------------------------------------      NewOrder         ---------------------------------------------------------
/// An item as requested by the caller, before pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl NewOrderItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

/// A fully priced order, ready to be persisted together with its items in one transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub total_amount: Money,
    pub total_items: i64,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderTotalsError {
    #[error("The price of product {product_id} times quantity {quantity} is too large")]
    LineTotalOverflow { product_id: i64, quantity: i64 },
    #[error("The order total amount is too large")]
    TotalAmountOverflow,
    #[error("The order total item count is too large")]
    TotalItemsOverflow,
}

impl NewOrder {
    /// Builds a new order from priced items. The totals are derived from the items, and an order whose totals do not
    /// fit in 64 bits is refused.
    pub fn new(items: Vec<OrderItem>) -> Result<Self, OrderTotalsError> {
        let mut total_amount = Money::default();
        let mut total_items = 0i64;
        for item in &items {
            let line = item.price.checked_mul(item.quantity).ok_or(OrderTotalsError::LineTotalOverflow {
                product_id: item.product_id,
                quantity: item.quantity,
            })?;
            total_amount = total_amount.checked_add(line).ok_or(OrderTotalsError::TotalAmountOverflow)?;
            total_items = total_items.checked_add(item.quantity).ok_or(OrderTotalsError::TotalItemsOverflow)?;
        }
        Ok(Self { id: OrderId::random(), total_amount, total_items, items, created_at: Utc::now() })
    }
}

//--------------------------------------     OrderReceipt      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub id: i64,
    pub order_id: OrderId,
    pub receipt_url: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------       Product         ---------------------------------------------------------
/// A product, as reported by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Money,
}
