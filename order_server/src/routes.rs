//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that need more than a few lines of glue belong in the engine, not
//! here.
//!
//! Handlers never block the worker thread. Everything that waits (the database, the catalog, the payment service) is
//! awaited, so a worker keeps serving other requests in the meantime.
use actix_web::{get, post, web, HttpResponse, Responder};
use log::*;
use order_engine::{
    db_types::OrderId,
    events::{EventProducer, PaymentSucceededEvent},
    payment_objects::PaymentSucceeded,
    traits::{OrderManagement, PaymentSessions, ProductCatalog},
    OrderFlowApi,
};

use crate::{
    data_objects::{ChangeStatusRequest, CreateOrderRequest, JsonResponse, OrdersQuery},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl OrderManagement, ProductCatalog, PaymentSessions);
pub async fn create_order<B, C, P>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<OrderFlowApi<B, C, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: ProductCatalog,
    P: PaymentSessions,
{
    let request = body.into_inner();
    request.validate()?;
    debug!("💻️ New order request with {} items", request.items.len());
    let created = api.create_order(request.items).await?;
    Ok(HttpResponse::Created().json(created))
}

route!(orders => Get "/orders" impl OrderManagement, ProductCatalog, PaymentSessions);
pub async fn orders<B, C, P>(
    query: web::Query<OrdersQuery>,
    api: web::Data<OrderFlowApi<B, C, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: ProductCatalog,
    P: PaymentSessions,
{
    let (filter, pagination) = query.into_inner().into_parts()?;
    trace!("💻️ Fetching orders. {filter} Page {} of {}", pagination.page(), pagination.limit());
    let page = api.fetch_orders(filter, pagination).await?;
    Ok(HttpResponse::Ok().json(page))
}

route!(order_by_id => Get "/orders/{order_id}" impl OrderManagement, ProductCatalog, PaymentSessions);
pub async fn order_by_id<B, C, P>(
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B, C, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: ProductCatalog,
    P: PaymentSessions,
{
    let order_id = path.into_inner();
    trace!("💻️ Fetching order [{order_id}]");
    let order = api.fetch_order(&order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(change_order_status => Patch "/orders/{order_id}/status" impl OrderManagement, ProductCatalog, PaymentSessions);
pub async fn change_order_status<B, C, P>(
    path: web::Path<OrderId>,
    body: web::Json<ChangeStatusRequest>,
    api: web::Data<OrderFlowApi<B, C, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: ProductCatalog,
    P: PaymentSessions,
{
    let order_id = path.into_inner();
    let ChangeStatusRequest { status } = body.into_inner();
    debug!("💻️ Status change requested for [{order_id}]: {status}");
    let order = api.change_order_status(&order_id, status).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(payment_session => Post "/orders/{order_id}/payment_session" impl OrderManagement, ProductCatalog, PaymentSessions);
pub async fn payment_session<B, C, P>(
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B, C, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: ProductCatalog,
    P: PaymentSessions,
{
    let order_id = path.into_inner();
    debug!("💻️ New payment session requested for [{order_id}]");
    let session = api.retry_payment_session(&order_id).await?;
    Ok(HttpResponse::Ok().json(session))
}

//----------------------------------------------   Events  ----------------------------------------------------
/// Queues a payment confirmation for settlement and acknowledges it straight away. The confirmation is applied by
/// the payment event handler; duplicates are harmless.
#[post("/events/payment_succeeded")]
pub async fn payment_succeeded(
    body: web::Json<PaymentSucceeded>,
    producer: web::Data<EventProducer<PaymentSucceededEvent>>,
) -> impl Responder {
    let payment = body.into_inner();
    info!("💻️ Payment confirmation received for order [{}]. Charge: {}", payment.order_id, payment.stripe_payment_id);
    let order_id = payment.order_id.clone();
    producer.publish_event(PaymentSucceededEvent::new(payment)).await;
    HttpResponse::Accepted().json(JsonResponse::success(format!("Payment confirmation for order {order_id} accepted")))
}
