use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use order_engine::{
    db_types::{NewOrderItem, OrderId, OrderStatusType},
    events::OrderPaidPublisher,
    payment_objects::PaymentSucceeded,
    test_utils::prepare_env::memory_db,
    traits::OrderManagement,
    OrderFlowApi,
    OrderFlowConfig,
    OrderStoreError,
    RemoteCallError,
};
use serde_json::json as json_value;

use super::{
    helpers::{catalog_of, configure_with, event_sink, json, memory_api, payments_ok, product, send_request, test_config},
    mocks::{MockCatalog, MockOrderStore, MockPayments},
};

fn shop() -> MockCatalog {
    catalog_of(vec![product(1, "Mug", 10), product(2, "Tee", 15)])
}

#[actix_web::test]
async fn health() {
    let api = memory_api(MockCatalog::new(), MockPayments::new()).await;
    let (sink, _rx) = event_sink();
    let (status, body) = send_request(TestRequest::get().uri("/health"), configure_with(api, sink)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn create_order() {
    let api = memory_api(shop(), payments_ok()).await;
    let (sink, _rx) = event_sink();
    let req = TestRequest::post().uri("/orders").set_json(json_value!({"items": [{"productId": 1, "quantity": 2}]}));
    let (status, body) = send_request(req, configure_with(api.clone(), sink)).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    let order = &body["order"];
    assert_eq!(order["totalAmount"], 20.0);
    assert_eq!(order["totalItems"], 2);
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["paid"], false);
    assert_eq!(order["items"][0]["name"], "Mug");
    assert_eq!(order["items"][0]["price"], 10.0);
    let id = order["id"].as_str().unwrap();
    assert_eq!(body["paymentSession"]["url"], format!("https://checkout.example.com/s/{id}"));
    let stored = api.fetch_order(&id.parse().unwrap()).await.unwrap();
    assert_eq!(stored.order.total_items, 2);
}

#[actix_web::test]
async fn create_order_rejects_bad_items() {
    let cases = [
        json_value!({"items": []}),
        json_value!({"items": [{"productId": 1, "quantity": 0}]}),
        json_value!({"items": [{"productId": -1, "quantity": 1}]}),
        json_value!({"items": [{"productId": 1}]}),
        json_value!({"products": [{"productId": 1, "quantity": 1}]}),
    ];
    for case in cases {
        // Nothing may reach the catalog
        let api = memory_api(MockCatalog::new(), MockPayments::new()).await;
        let (sink, _rx) = event_sink();
        let req = TestRequest::post().uri("/orders").set_json(&case);
        let (status, body) = send_request(req, configure_with(api, sink)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert_eq!(json(&body)["status"], 400);
    }
}

#[actix_web::test]
async fn create_order_rejects_totals_that_do_not_fit() {
    let huge = i64::MAX / 2 + 1;
    let mut payments = MockPayments::new();
    payments.expect_create_payment_session().never();
    let api = memory_api(shop(), payments).await;
    let (sink, _rx) = event_sink();
    let req = TestRequest::post().uri("/orders").set_json(json_value!({"items": [{"productId": 1, "quantity": huge}]}));
    let (status, body) = send_request(req, configure_with(api.clone(), sink)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["status"], 400);
    assert!(body["message"].as_str().unwrap().contains("too large"), "{body}");
    let page = api.fetch_orders(Default::default(), Default::default()).await.unwrap();
    assert_eq!(page.meta.total, 0);
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let api = memory_api(MockCatalog::new(), MockPayments::new()).await;
    let (sink, _rx) = event_sink();
    let req = TestRequest::post()
        .uri("/orders")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"items\": [");
    let (status, body) = send_request(req, configure_with(api, sink)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["status"], 400);
    assert!(body["message"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn unknown_products_are_priced_at_zero() {
    let api = memory_api(shop(), payments_ok()).await;
    let (sink, _rx) = event_sink();
    let req = TestRequest::post()
        .uri("/orders")
        .set_json(json_value!({"items": [{"productId": 1, "quantity": 1}, {"productId": 99, "quantity": 2}]}));
    let (status, body) = send_request(req, configure_with(api, sink)).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["order"]["totalAmount"], 10.0);
    assert_eq!(body["order"]["totalItems"], 3);
    assert_eq!(body["order"]["items"][1]["price"], 0.0);
}

#[actix_web::test]
async fn unknown_products_can_be_rejected() {
    let config = OrderFlowConfig { reject_unknown_products: true, ..test_config() };
    let api = OrderFlowApi::new(memory_db().await, shop(), MockPayments::new(), config, OrderPaidPublisher::default());
    let api = web::Data::new(api);
    let (sink, _rx) = event_sink();
    let req = TestRequest::post()
        .uri("/orders")
        .set_json(json_value!({"items": [{"productId": 1, "quantity": 1}, {"productId": 99, "quantity": 1}]}));
    let (status, body) = send_request(req, configure_with(api.clone(), sink)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["message"].as_str().unwrap().contains("99"));
    let page = api.fetch_orders(Default::default(), Default::default()).await.unwrap();
    assert_eq!(page.meta.total, 0);
}

#[actix_web::test]
async fn catalog_outage_is_service_unavailable() {
    let mut catalog = MockCatalog::new();
    catalog.expect_validate_products().returning(|_| Err(RemoteCallError::Unreachable("connection refused".into())));
    let api = memory_api(catalog, MockPayments::new()).await;
    let (sink, _rx) = event_sink();
    let req = TestRequest::post().uri("/orders").set_json(json_value!({"items": [{"productId": 1, "quantity": 1}]}));
    let (status, body) = send_request(req, configure_with(api.clone(), sink)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json(&body)["status"], 503);
    let page = api.fetch_orders(Default::default(), Default::default()).await.unwrap();
    assert_eq!(page.meta.total, 0);
}

#[actix_web::test]
async fn payment_outage_leaves_a_pending_order() {
    let mut payments = MockPayments::new();
    payments.expect_create_payment_session().returning(|_| Err(RemoteCallError::Timeout));
    let api = memory_api(shop(), payments).await;
    let (sink, _rx) = event_sink();
    let req = TestRequest::post().uri("/orders").set_json(json_value!({"items": [{"productId": 2, "quantity": 1}]}));
    let (status, body) = send_request(req, configure_with(api.clone(), sink)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let page = api.fetch_orders(Default::default(), Default::default()).await.unwrap();
    assert_eq!(page.meta.total, 1);
    let order = &page.data[0];
    assert_eq!(order.status, OrderStatusType::Pending);
    assert!(json(&body)["message"].as_str().unwrap().contains(order.id.as_str()));
}

#[actix_web::test]
async fn database_failure_is_an_internal_error() {
    let mut store = MockOrderStore::new();
    store.expect_insert_order().returning(|_| Err(OrderStoreError::DatabaseError("disk I/O error".into())));
    let api = OrderFlowApi::new(store, shop(), MockPayments::new(), test_config(), OrderPaidPublisher::default());
    let api = web::Data::new(api);
    let (sink, _rx) = event_sink();
    let req = TestRequest::post().uri("/orders").set_json(json_value!({"items": [{"productId": 1, "quantity": 1}]}));
    let (status, body) = send_request(req, configure_with(api, sink)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body)["status"], 500);
}

#[actix_web::test]
async fn list_orders_with_pagination() {
    let api = memory_api(shop(), payments_ok()).await;
    for _ in 0..15 {
        api.create_order(vec![NewOrderItem::new(1, 1)]).await.unwrap();
    }
    let (sink, _rx) = event_sink();
    let app = test::init_service(App::new().configure(configure_with(api.clone(), sink))).await;

    let req = TestRequest::get().uri("/orders?page=2&limit=10").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["meta"], json_value!({"total": 15, "page": 2, "lastPage": 2}));

    let req = TestRequest::get().uri("/orders").to_request();
    let body: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["meta"], json_value!({"total": 15, "page": 1, "lastPage": 2}));

    let req = TestRequest::get().uri("/orders?status=PAID").to_request();
    let body: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"], json_value!([]));
    assert_eq!(body["meta"], json_value!({"total": 0, "page": 1, "lastPage": 0}));

    let req = TestRequest::get().uri("/orders?limit=9223372036854775807").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 15);
    assert_eq!(body["meta"], json_value!({"total": 15, "page": 1, "lastPage": 1}));
}

#[actix_web::test]
async fn list_orders_rejects_bad_queries() {
    let api = memory_api(MockCatalog::new(), MockPayments::new()).await;
    let (sink, _rx) = event_sink();
    let app = test::init_service(App::new().configure(configure_with(api, sink))).await;
    for uri in ["/orders?page=0", "/orders?limit=-1", "/orders?status=SHIPPED", "/orders?page=two"] {
        let res = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], 400);
    }
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let api = memory_api(shop(), payments_ok()).await;
    let created = api.create_order(vec![NewOrderItem::new(1, 2), NewOrderItem::new(2, 1)]).await.unwrap();
    let id = created.order.order.id.clone();
    let (sink, _rx) = event_sink();
    let app = test::init_service(App::new().configure(configure_with(api, sink))).await;

    let req = TestRequest::get().uri(&format!("/orders/{id}")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["totalAmount"], 35.0);
    assert_eq!(body["items"][0]["name"], "Mug");
    assert_eq!(body["items"][1]["name"], "Tee");

    let req = TestRequest::get().uri(&format!("/orders/{}", OrderId::random())).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["status"], 404);

    let res = test::call_service(&app, TestRequest::get().uri("/orders/not-an-id").to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn change_order_status() {
    let api = memory_api(shop(), payments_ok()).await;
    let created = api.create_order(vec![NewOrderItem::new(1, 1)]).await.unwrap();
    let id = created.order.order.id.clone();
    let (sink, _rx) = event_sink();
    let app = test::init_service(App::new().configure(configure_with(api.clone(), sink))).await;
    let uri = format!("/orders/{id}/status");

    let req = TestRequest::patch().uri(&uri).set_json(json_value!({"status": "DELIVERED"})).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let delivered: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(delivered["status"], "DELIVERED");

    // Same status again changes nothing
    let req = TestRequest::patch().uri(&uri).set_json(json_value!({"status": "DELIVERED"})).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let again: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(again["updatedAt"], delivered["updatedAt"]);

    // Any status may follow any other
    let req = TestRequest::patch().uri(&uri).set_json(json_value!({"status": "PENDING"})).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = TestRequest::patch().uri(&uri).set_json(json_value!({"status": "SHIPPED"})).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let missing = format!("/orders/{}/status", OrderId::random());
    let req = TestRequest::patch().uri(&missing).set_json(json_value!({"status": "CANCELLED"})).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let order = api.db().fetch_order(&id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Pending);
    assert!(!order.paid);
}

#[actix_web::test]
async fn payment_session_for_paid_order_is_a_conflict() {
    let api = memory_api(shop(), payments_ok()).await;
    let created = api.create_order(vec![NewOrderItem::new(1, 1)]).await.unwrap();
    let id = created.order.order.id.clone();
    let (sink, _rx) = event_sink();
    let app = test::init_service(App::new().configure(configure_with(api.clone(), sink))).await;
    let uri = format!("/orders/{id}/payment_session");

    let res = test::call_service(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["paymentSession"]["url"], format!("https://checkout.example.com/s/{id}"));

    let payment = PaymentSucceeded::new(id.clone(), "ch_001", "https://pay.example.com/r/1");
    api.process_payment_succeeded(payment).await.unwrap();
    let res = test::call_service(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["status"], 409);
}
