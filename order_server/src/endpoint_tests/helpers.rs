use std::time::Duration;

use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web::{self, ServiceConfig},
    App,
};
use log::debug;
use oms_common::Money;
use order_engine::{
    db_types::Product,
    events::{EventProducer, OrderPaidPublisher, PaymentSucceededEvent},
    test_utils::prepare_env::memory_db,
    traits::{OrderManagement, PaymentSessions, ProductCatalog},
    OrderFlowApi,
    OrderFlowConfig,
    SqliteDatabase,
};
use tokio::sync::mpsc;

use super::mocks::{MockCatalog, MockPayments};
use crate::server::configure_routes;

pub type TestApi = OrderFlowApi<SqliteDatabase, MockCatalog, MockPayments>;

pub fn test_config() -> OrderFlowConfig {
    OrderFlowConfig { rpc_timeout: Duration::from_millis(250), ..Default::default() }
}

/// An api backed by a fresh in-memory database
pub async fn memory_api(catalog: MockCatalog, payments: MockPayments) -> web::Data<TestApi> {
    let db = memory_db().await;
    web::Data::new(OrderFlowApi::new(db, catalog, payments, test_config(), OrderPaidPublisher::default()))
}

/// Registers the routes against `api`. Payment confirmations go to `events`.
pub fn configure_with<B, C, P>(
    api: web::Data<OrderFlowApi<B, C, P>>,
    events: EventProducer<PaymentSucceededEvent>,
) -> impl FnOnce(&mut ServiceConfig)
where
    B: OrderManagement + 'static,
    C: ProductCatalog + 'static,
    P: PaymentSessions + 'static,
{
    move |cfg| {
        cfg.app_data(api).app_data(web::Data::new(events));
        configure_routes::<B, C, P>(cfg);
    }
}

/// A payment event producer whose events can be read back from the returned receiver
pub fn event_sink() -> (EventProducer<PaymentSucceededEvent>, mpsc::Receiver<PaymentSucceededEvent>) {
    let (sender, receiver) = mpsc::channel(10);
    (EventProducer::new(sender), receiver)
}

pub async fn send_request(req: TestRequest, configure: impl FnOnce(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub fn product(id: i64, name: &str, units: i64) -> Product {
    Product { id, name: name.to_string(), price: Money::from_units(units) }
}

pub fn catalog_of(products: Vec<Product>) -> MockCatalog {
    let mut catalog = MockCatalog::new();
    catalog.expect_validate_products().returning(move |ids| {
        Ok(products.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    });
    catalog
}

pub fn payments_ok() -> MockPayments {
    let mut payments = MockPayments::new();
    payments.expect_create_payment_session().returning(|req| {
        Ok(serde_json::json!({ "url": format!("https://checkout.example.com/s/{}", req.order_id) }))
    });
    payments
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Response was not JSON: {e}. {body}"))
}
