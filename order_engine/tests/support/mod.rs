use std::time::Duration;

use log::*;
use mockall::mock;
use order_engine::{
    db_types::{Money, Product},
    events::OrderPaidPublisher,
    payment_objects::PaymentSessionRequest,
    OrderFlowApi,
    OrderFlowConfig,
    PaymentSessions,
    ProductCatalog,
    RemoteCallError,
    SqliteDatabase,
};

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

pub type TestApi = OrderFlowApi<SqliteDatabase, MockCatalog, MockPayments>;

pub async fn memory_db() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Error creating in-memory database");
    db.migrate().await.expect("Error running DB migrations");
    debug!("🚀️ In-memory database ready");
    db
}

pub fn test_config() -> OrderFlowConfig {
    OrderFlowConfig { rpc_timeout: Duration::from_millis(250), ..Default::default() }
}

pub async fn api_with(catalog: MockCatalog, payments: MockPayments, order_paid: OrderPaidPublisher) -> TestApi {
    let db = memory_db().await;
    OrderFlowApi::new(db, catalog, payments, test_config(), order_paid)
}

pub fn product(id: i64, name: &str, units: i64) -> Product {
    Product { id, name: name.to_string(), price: Money::from_units(units) }
}

/// A catalog that knows the given products and answers every lookup from them
pub fn catalog_of(products: Vec<Product>) -> MockCatalog {
    let mut catalog = MockCatalog::new();
    catalog.expect_validate_products().returning(move |ids| {
        Ok(products.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    });
    catalog
}

/// A payment service that opens a session for every request
pub fn payments_ok() -> MockPayments {
    let mut payments = MockPayments::new();
    payments.expect_create_payment_session().returning(|req| {
        Ok(serde_json::json!({
            "url": format!("https://checkout.example.com/s/{}", req.order_id),
            "currency": req.currency,
        }))
    });
    payments
}
