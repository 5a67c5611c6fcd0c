use std::fmt::Display;

use order_engine::{
    db_types::{NewOrderItem, OrderStatusType},
    order_objects::{OrderQueryFilter, Pagination},
};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// Body of `POST /orders`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    pub items: Vec<NewOrderItem>,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.items.is_empty() {
            return Err(ServerError::ValidationError("items must contain at least one entry".into()));
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.product_id <= 0 {
                return Err(ServerError::ValidationError(format!(
                    "items[{i}].productId must be a positive integer, got {}",
                    item.product_id
                )));
            }
            if item.quantity <= 0 {
                return Err(ServerError::ValidationError(format!(
                    "items[{i}].quantity must be a positive integer, got {}",
                    item.quantity
                )));
            }
        }
        Ok(())
    }
}

/// Body of `PATCH /orders/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeStatusRequest {
    pub status: OrderStatusType,
}

/// Query string of `GET /orders`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrdersQuery {
    pub status: Option<OrderStatusType>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl OrdersQuery {
    pub fn into_parts(self) -> Result<(OrderQueryFilter, Pagination), ServerError> {
        let pagination = Pagination { page: self.page, limit: self.limit };
        pagination.validate().map_err(|e| ServerError::InvalidQuery(e.to_string()))?;
        Ok((OrderQueryFilter { status: self.status }, pagination))
    }
}
