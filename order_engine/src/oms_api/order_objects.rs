use std::{collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::{Money, Order, OrderItem, OrderStatusType, OrderWithItems, Product};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

//--------------------------------------      Pagination       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be a positive integer, got {0}")]
    InvalidPage(i64),
    #[error("limit must be a positive integer, got {0}")]
    InvalidLimit(i64),
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page: Some(page), limit: Some(limit) }
    }

    pub fn validate(&self) -> Result<(), PaginationError> {
        match (self.page, self.limit) {
            (Some(p), _) if p < 1 => Err(PaginationError::InvalidPage(p)),
            (_, Some(l)) if l < 1 => Err(PaginationError::InvalidLimit(l)),
            _ => Ok(()),
        }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    /// The number of records to skip to reach the current page
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub last_page: i64,
}

impl PageMeta {
    /// `last_page` is `ceil(total / limit)`, so an empty result set has a last page of zero.
    pub fn new(total: i64, pagination: &Pagination) -> Self {
        let limit = pagination.limit().max(1);
        let last_page = if total <= 0 { 0 } else { (total - 1) / limit + 1 };
        Self { total, page: pagination.page(), last_page }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPage {
    pub data: Vec<Order>,
    pub meta: PageMeta,
}

//--------------------------------------   OrderQueryFilter    ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub status: Option<OrderStatusType>,
}

impl OrderQueryFilter {
    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.status {
            None => write!(f, "No filters."),
            Some(status) => write!(f, "status: {status}."),
        }
    }
}

//--------------------------------------  OrderWithProducts    ---------------------------------------------------------
/// A line item joined with the product name reported by the catalog. Names are for presentation only and are never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub price: Money,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithProducts {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<ProductOrderItem>,
}

impl OrderWithProducts {
    /// Joins the stored items against `products`. Items with no matching product get an empty name.
    pub fn join(order: OrderWithItems, products: &[Product]) -> Self {
        let names = products.iter().map(|p| (p.id, p.name.as_str())).collect::<HashMap<i64, &str>>();
        let items = order
            .items
            .into_iter()
            .map(|OrderItem { product_id, quantity, price }| {
                let name = names.get(&product_id).map(|s| s.to_string()).unwrap_or_default();
                ProductOrderItem { product_id, quantity, price, name }
            })
            .collect();
        Self { order: order.order, items }
    }

    /// Attaches empty names to every item. Used when the catalog can't be reached for presentation data.
    pub fn without_names(order: OrderWithItems) -> Self {
        Self::join(order, &[])
    }
}

/// The result of placing (or re-requesting payment for) an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order: OrderWithProducts,
    /// The payment service's session reference, forwarded verbatim
    pub payment_session: serde_json::Value,
}
