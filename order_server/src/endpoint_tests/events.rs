use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use actix_web::{http::StatusCode, test, test::TestRequest, App};
use futures::future::BoxFuture;
use order_engine::{
    db_types::{NewOrderItem, OrderId, OrderStatusType},
    events::{OrderEvents, OrderPaidEvent, PaymentSucceededEvent},
    payment_objects::PaymentSucceeded,
    test_utils::prepare_env::memory_db,
    traits::OrderManagement,
    OrderFlowApi,
};
use serde_json::json as json_value;

use super::{
    helpers::{catalog_of, configure_with, event_sink, json, memory_api, payments_ok, product, send_request, test_config},
    mocks::{MockCatalog, MockPayments},
};
use crate::server::apply_payment_event;

#[actix_web::test]
async fn payment_confirmations_are_queued() {
    let api = memory_api(MockCatalog::new(), MockPayments::new()).await;
    let (sink, mut rx) = event_sink();
    let order_id = OrderId::random();
    let req = TestRequest::post().uri("/events/payment_succeeded").set_json(json_value!({
        "orderId": order_id.as_str(),
        "stripePaymentId": "ch_3PabcXYZ",
        "receiptUrl": "https://pay.example.com/receipts/rcpt_1"
    }));
    let (status, body) = send_request(req, configure_with(api, sink)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json(&body)["success"], true);
    let event = rx.try_recv().expect("The confirmation was not queued");
    assert_eq!(event.payment, PaymentSucceeded::new(order_id, "ch_3PabcXYZ", "https://pay.example.com/receipts/rcpt_1"));
}

#[actix_web::test]
async fn incomplete_confirmations_are_rejected() {
    let cases = [
        json_value!({"orderId": "not-a-uuid", "stripePaymentId": "ch_1", "receiptUrl": "https://r"}),
        json_value!({"orderId": "0f6a2d1e-4c4b-4f4e-9a59-5b0f0e1c2d3a", "receiptUrl": "https://r"}),
        json_value!({"orderId": "0f6a2d1e-4c4b-4f4e-9a59-5b0f0e1c2d3a", "stripePaymentId": "ch_1"}),
    ];
    for case in cases {
        let api = memory_api(MockCatalog::new(), MockPayments::new()).await;
        let (sink, mut rx) = event_sink();
        let req = TestRequest::post().uri("/events/payment_succeeded").set_json(&case);
        let (status, body) = send_request(req, configure_with(api, sink)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert_eq!(json(&body)["status"], 400);
        assert!(rx.try_recv().is_err());
    }
}

#[actix_web::test]
async fn repeated_confirmations_settle_once() {
    let _ = env_logger::try_init();
    let paid_count = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&paid_count);
    let mut events = OrderEvents::new(10);
    events.on_order_paid(move |_ev: OrderPaidEvent| {
        let counter = Arc::clone(&counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }) as BoxFuture<'static, ()>
    });
    let order_paid = events.order_paid_publisher();
    events.start();

    let db = memory_db().await;
    let catalog = catalog_of(vec![product(1, "Mug", 10)]);
    let api = OrderFlowApi::new(db, catalog, payments_ok(), test_config(), order_paid);
    let created = api.create_order(vec![NewOrderItem::new(1, 2)]).await.unwrap();
    let id = created.order.order.id;

    let first = PaymentSucceeded::new(id.clone(), "ch_001", "https://pay.example.com/r/1");
    let second = PaymentSucceeded::new(id.clone(), "ch_002", "https://pay.example.com/r/2");
    apply_payment_event(&api, PaymentSucceededEvent::new(first.clone())).await;
    apply_payment_event(&api, PaymentSucceededEvent::new(first)).await;
    apply_payment_event(&api, PaymentSucceededEvent::new(second)).await;

    let order = api.db().fetch_order(&id).await.unwrap().unwrap();
    assert!(order.paid);
    assert!(order.paid_at.is_some());
    assert_eq!(order.status, OrderStatusType::Paid);
    assert_eq!(order.stripe_charge_id.as_deref(), Some("ch_001"));
    let receipt = api.db().fetch_receipt(&id).await.unwrap().unwrap();
    assert_eq!(receipt.receipt_url, "https://pay.example.com/r/1");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(paid_count.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn confirmation_for_unknown_order_is_dropped() {
    let api = memory_api(MockCatalog::new(), MockPayments::new()).await;
    let payment = PaymentSucceeded::new(OrderId::random(), "ch_001", "https://r/1");
    apply_payment_event(&api, PaymentSucceededEvent::new(payment)).await;
    let page = api.fetch_orders(Default::default(), Default::default()).await.unwrap();
    assert_eq!(page.meta.total, 0);
}

#[actix_web::test]
async fn confirmations_flow_from_route_to_settlement() {
    let api = memory_api(catalog_of(vec![product(1, "Mug", 10)]), payments_ok()).await;
    let created = api.create_order(vec![NewOrderItem::new(1, 1)]).await.unwrap();
    let id = created.order.order.id;

    let settler = api.clone().into_inner();
    let mut events = OrderEvents::new(4);
    let producer = events.settle_with(move |event: PaymentSucceededEvent| {
        let api = Arc::clone(&settler);
        Box::pin(async move { apply_payment_event(&api, event).await }) as BoxFuture<'static, ()>
    });
    events.start();

    let app = test::init_service(App::new().configure(configure_with(api.clone(), producer))).await;
    let payload = json_value!({
        "orderId": id.as_str(),
        "stripePaymentId": "ch_777",
        "receiptUrl": "https://pay.example.com/r/777"
    });
    for _ in 0..3 {
        let req = TestRequest::post().uri("/events/payment_succeeded").set_json(&payload).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    let mut paid = false;
    for _ in 0..50 {
        if api.db().fetch_order(&id).await.unwrap().unwrap().paid {
            paid = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(paid, "The order was never settled");
    let receipt = api.db().fetch_receipt(&id).await.unwrap().unwrap();
    assert_eq!(receipt.receipt_url, "https://pay.example.com/r/777");
}
