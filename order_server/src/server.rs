use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use futures::future::BoxFuture;
use log::*;
use order_engine::{
    events::{EventProducer, OrderEvents, OrderPaidEvent, PaymentSucceededEvent},
    traits::{OrderManagement, PaymentSessions, ProductCatalog},
    OrderFlowApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::{HttpCatalog, HttpPayments},
    routes::{
        health,
        payment_succeeded,
        ChangeOrderStatusRoute,
        CreateOrderRoute,
        OrderByIdRoute,
        OrdersRoute,
        PaymentSessionRoute,
    },
};

pub type OrderServerApi = OrderFlowApi<SqliteDatabase, HttpCatalog, HttpPayments>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let catalog = HttpCatalog::new(config.catalog.clone())?;
    let payments = HttpPayments::new(config.payments.clone())?;

    let mut events = OrderEvents::new(config.event_buffer_size);
    events.on_order_paid(log_order_paid);
    let order_paid = events.order_paid_publisher();
    let api = Arc::new(OrderFlowApi::new(db.clone(), catalog, payments, config.order_flow_config(), order_paid));
    let payment_producer = events.settle_with(settle_payments(Arc::clone(&api)));
    events.start();

    let srv = create_server_instance(config, api, payment_producer)?;
    let result = srv.await.map_err(ServerError::from);
    info!("💻️ Server stopped. Closing the database.");
    db.close().await;
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    api: Arc<OrderServerApi>,
    payment_events: EventProducer<PaymentSucceededEvent>,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("oms::access_log"))
            .app_data(web::Data::from(Arc::clone(&api)))
            .app_data(web::Data::new(payment_events.clone()))
            .configure(configure_routes::<SqliteDatabase, HttpCatalog, HttpPayments>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route, plus extractor settings that turn malformed bodies, paths and query strings into
/// [`ServerError`] responses.
///
/// The app must also be given a `web::Data<OrderFlowApi<B, C, P>>` and a
/// `web::Data<EventProducer<PaymentSucceededEvent>>`.
pub fn configure_routes<B, C, P>(cfg: &mut web::ServiceConfig)
where
    B: OrderManagement + 'static,
    C: ProductCatalog + 'static,
    P: PaymentSessions + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(|e, _| ServerError::InvalidRequestBody(e.to_string()).into()))
        .app_data(web::PathConfig::default().error_handler(|e, _| ServerError::InvalidRequestPath(e.to_string()).into()))
        .app_data(web::QueryConfig::default().error_handler(|e, _| ServerError::InvalidQuery(e.to_string()).into()))
        .service(health)
        .service(payment_succeeded)
        .service(CreateOrderRoute::<B, C, P>::new())
        .service(OrdersRoute::<B, C, P>::new())
        .service(OrderByIdRoute::<B, C, P>::new())
        .service(ChangeOrderStatusRoute::<B, C, P>::new())
        .service(PaymentSessionRoute::<B, C, P>::new());
}

/// The settlement handler for [`OrderEvents::settle_with`]. Each queued confirmation is applied to its order.
pub fn settle_payments(
    api: Arc<OrderServerApi>,
) -> impl Fn(PaymentSucceededEvent) -> BoxFuture<'static, ()> + Send + Sync + 'static {
    move |event: PaymentSucceededEvent| {
        let api = Arc::clone(&api);
        Box::pin(async move { apply_payment_event(&api, event).await }) as BoxFuture<'static, ()>
    }
}

/// Settles the order named by `event`. The confirmation was already acknowledged with a 202, so a failure here is
/// logged and the event is dropped.
pub async fn apply_payment_event<B, C, P>(api: &OrderFlowApi<B, C, P>, event: PaymentSucceededEvent)
where
    B: OrderManagement,
    C: ProductCatalog,
    P: PaymentSessions,
{
    let order_id = event.payment.order_id.clone();
    trace!("💻️ Applying payment confirmation for [{order_id}], received at {}", event.received_at);
    match api.process_payment_succeeded(event.payment).await {
        Ok(result) if result.newly_settled => debug!("💻️ Order [{order_id}] settled"),
        Ok(_) => debug!("💻️ Order [{order_id}] was already settled"),
        Err(e) => error!("💻️ Could not apply the payment confirmation for order [{order_id}]. Dropping it. {e}"),
    }
}

fn log_order_paid(event: OrderPaidEvent) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        info!(
            "💻️💰️ Order [{}] paid. {} items, total {}. Receipt: {}",
            event.order.id, event.order.total_items, event.order.total_amount, event.receipt.receipt_url
        );
    })
}
