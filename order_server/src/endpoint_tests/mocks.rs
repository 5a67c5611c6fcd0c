use mockall::mock;
use order_engine::{
    db_types::{NewOrder, Order, OrderId, OrderReceipt, OrderStatusType, OrderWithItems, Product},
    order_objects::{OrderQueryFilter, Pagination},
    payment_objects::PaymentSessionRequest,
    traits::{OrderManagement, OrderStoreError, PaymentSessions, ProductCatalog, RemoteCallError, SettlementResult},
};

mock! {
    pub OrderStore {}
    impl OrderManagement for OrderStore {
        async fn insert_order(&self, order: NewOrder) -> Result<OrderWithItems, OrderStoreError>;
        async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, OrderStoreError>;
        async fn fetch_order_with_items(&self, id: &OrderId) -> Result<Option<OrderWithItems>, OrderStoreError>;
        async fn search_orders(&self, filter: &OrderQueryFilter, pagination: &Pagination) -> Result<Vec<Order>, OrderStoreError>;
        async fn count_orders(&self, filter: &OrderQueryFilter) -> Result<i64, OrderStoreError>;
        async fn update_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, OrderStoreError>;
        async fn settle_order(&self, id: &OrderId, charge_id: &str, receipt_url: &str) -> Result<SettlementResult, OrderStoreError>;
        async fn fetch_receipt(&self, id: &OrderId) -> Result<Option<OrderReceipt>, OrderStoreError>;
    }
}

mock! {
    pub Catalog {}
    impl ProductCatalog for Catalog {
        async fn validate_products(&self, ids: &[i64]) -> Result<Vec<Product>, RemoteCallError>;
    }
}

mock! {
    pub Payments {}
    impl PaymentSessions for Payments {
        async fn create_payment_session(&self, request: PaymentSessionRequest) -> Result<serde_json::Value, RemoteCallError>;
    }
}
