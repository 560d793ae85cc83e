use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use pvz_client::models::{Barcode, Cargo, OrderCost, PaymentType, UndeliverableOption, Warehouse};
use pvz_client::{
    ApiClient, ApiError, ClientConfig, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    Order, OrderReference, PickupPointsQuery, RemoteErrorKind, RequestBody, RequestLogger,
    TransportError,
};
use serde_json::{json, Value};

// Transporte espía: guarda cada petición y devuelve respuestas en cola
struct SpyTransport {
    requests: Mutex<Vec<(HttpRequest, Duration)>>,
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl SpyTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
        })
    }

    fn respond(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body.to_string())));
    }

    fn fail(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError::Other(message.to_string())));
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    fn timeouts(&self) -> Vec<Duration> {
        self.requests.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl HttpTransport for SpyTransport {
    async fn send(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push((request, timeout));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no response queued".to_string())))
    }
}

#[derive(Default)]
struct RecordingLogger {
    lines: Mutex<Vec<(String, Value)>>,
}

impl RequestLogger for RecordingLogger {
    fn info(&self, message: &str, context: &Value) {
        self.lines
            .lock()
            .unwrap()
            .push((message.to_string(), context.clone()));
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_token() -> String {
    encode(
        &Header::default(),
        &json!({ "sub": "OpenAPI", "exp": 4102444800i64 }),
        &EncodingKey::from_secret(b"test"),
    )
    .unwrap()
}

fn client_with(spy: &Arc<SpyTransport>) -> ApiClient {
    init_logging();
    ApiClient::builder(ClientConfig::new("my key"))
        .transport(spy.clone())
        .build()
        .unwrap()
}

async fn authenticated_client(spy: &Arc<SpyTransport>) -> ApiClient {
    let client = client_with(spy);
    client.set_token(test_token()).await;
    client
}

fn sample_order(sender_order_id: &str) -> Order {
    Order {
        sender_order_id: sender_order_id.to_string(),
        client_order_id: Some(format!("C-{}", sender_order_id)),
        brand_name: "Demo Shop".to_string(),
        client_name: "Анна Смирнова".to_string(),
        client_phone: "+79001112233".to_string(),
        client_email: None,
        sender_location: "WH-001".to_string(),
        receiver_location: "pvz-42".to_string(),
        undeliverable_option: UndeliverableOption::Utilization,
        cost: OrderCost {
            delivery_cost: 99.0,
            delivery_cost_currency: "RUB".to_string(),
            payment_value: 500.0,
            payment_currency: "RUB".to_string(),
            payment_type: PaymentType::Cashless,
            price: 500.0,
            price_currency: "RUB".to_string(),
        },
        cargoes: vec![Cargo {
            sender_cargo_id: format!("{}-1", sender_order_id),
            barcodes: vec![Barcode {
                value: "4600000000001".to_string(),
            }],
            height: 50,
            length: 100,
            width: 80,
            weight: 300,
            price: 500.0,
            currency: "RUB".to_string(),
            vat: 20,
            product_values: vec![],
        }],
    }
}

#[tokio::test]
async fn first_call_generates_token_with_a_form_post_then_caches_it() {
    let spy = SpyTransport::new();
    let client = client_with(&spy);
    let token = test_token();
    spy.respond(200, json!({ "jwt": token }));

    assert_eq!(client.get_token().await.unwrap(), token);

    let requests = spy.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path, "/jwt-generate-claims/rs256/1");
    assert_eq!(request.query.as_deref(), Some("apikey=my%20key"));
    assert_eq!(request.header("Authorization"), None);
    assert_eq!(
        request.body,
        Some(RequestBody::form(
            "subject=OpenAPI&audience=A122019%21".to_string()
        ))
    );

    // Con el token cacheado no hay más llamadas de red
    assert_eq!(client.get_token().await.unwrap(), token);
    assert_eq!(spy.requests().len(), 1);
    assert!(client.token_claims().await.unwrap().is_some());
}

#[tokio::test]
async fn domain_call_without_token_makes_two_sequential_requests() {
    let spy = SpyTransport::new();
    let client = client_with(&spy);
    let token = test_token();
    spy.respond(200, json!({ "jwt": token }));
    spy.respond(200, json!({ "content": [{ "id": "pvz-1" }], "totalPages": 1 }));

    let points = client
        .get_pickup_points(PickupPointsQuery::default())
        .await
        .unwrap();
    assert_eq!(points["content"][0]["id"], "pvz-1");

    let requests = spy.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].path, "/api/v1/pickuppoints/query");
    assert_eq!(
        requests[1].header("Authorization"),
        Some(format!("Bearer {}", token).as_str())
    );
    assert_eq!(
        requests[1].body,
        Some(RequestBody::json(
            r#"{"pageSize":1000,"pageNumber":0}"#.to_string()
        ))
    );
}

#[tokio::test]
async fn token_response_without_jwt_is_malformed() {
    let spy = SpyTransport::new();
    let client = client_with(&spy);
    spy.respond(200, json!({ "token": "x" }));

    assert!(matches!(
        client.refresh_token().await,
        Err(ApiError::MalformedToken(_))
    ));
    assert!(client.credentials().current().await.is_none());
}

#[tokio::test]
async fn malformed_cached_token_fails_without_refreshing() {
    let spy = SpyTransport::new();
    let client = client_with(&spy);
    client.set_token("garbage").await;

    let result = client
        .get_pickup_points(PickupPointsQuery::new(10, 2))
        .await;

    assert!(matches!(result, Err(ApiError::MalformedToken(_))));
    assert!(spy.requests().is_empty());
}

#[tokio::test]
async fn refresh_replaces_a_cached_token() {
    let spy = SpyTransport::new();
    let client = authenticated_client(&spy).await;
    let fresh = encode(
        &Header::default(),
        &json!({ "sub": "OpenAPI", "exp": 4102444801i64 }),
        &EncodingKey::from_secret(b"test"),
    )
    .unwrap();
    spy.respond(200, json!({ "jwt": fresh }));

    assert_eq!(client.refresh_token().await.unwrap(), fresh);
    assert_eq!(client.get_token().await.unwrap(), fresh);
    assert_eq!(spy.requests().len(), 1);
}

#[tokio::test]
async fn explicit_refresh_does_not_send_the_stale_token() {
    let spy = SpyTransport::new();
    let client = client_with(&spy);
    client.set_token("stale.expired.token").await;
    let fresh = test_token();
    spy.respond(200, json!({ "jwt": fresh }));

    assert_eq!(client.refresh_token().await.unwrap(), fresh);

    let requests = spy.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/jwt-generate-claims/rs256/1");
    assert_eq!(requests[0].header("Authorization"), None);
}

#[tokio::test]
async fn token_request_log_hides_the_api_key() {
    let spy = SpyTransport::new();
    let logger = Arc::new(RecordingLogger::default());
    init_logging();
    let client = ApiClient::builder(ClientConfig::new("super-secret-key"))
        .transport(spy.clone())
        .logger(logger.clone())
        .build()
        .unwrap();
    spy.respond(200, json!({}));

    let error = client.refresh_token().await.unwrap_err();
    let remote = error.as_remote().unwrap();
    assert!(remote.raw_request.contains("apikey=***"));
    assert!(!remote.raw_request.contains("super-secret-key"));

    let lines = logger.lines.lock().unwrap();
    assert!(lines
        .iter()
        .all(|(message, context)| !message.contains("super-secret-key")
            && !context.to_string().contains("super-secret-key")));
    assert_eq!(
        spy.requests()[0].query.as_deref(),
        Some("apikey=super-secret-key")
    );
}

#[tokio::test]
async fn create_orders_wraps_partner_orders_deterministically() {
    let spy = SpyTransport::new();
    let client = authenticated_client(&spy).await;
    let orders = vec![sample_order("A-1"), sample_order("A-2")];
    spy.respond(200, json!([{ "senderOrderId": "A-1", "created": true }]));
    spy.respond(200, json!([{ "senderOrderId": "A-1", "created": true }]));

    client.create_orders(&orders).await.unwrap();
    client.create_orders(&orders).await.unwrap();

    let requests = spy.requests();
    assert_eq!(requests[0].path, "/api/v1/createOrder");
    assert_eq!(requests[0].body, requests[1].body);

    let body: Value = serde_json::from_str(&requests[0].body.as_ref().unwrap().content).unwrap();
    let partner_orders = body["partnerOrders"].as_array().unwrap();
    assert_eq!(partner_orders.len(), 2);
    assert_eq!(partner_orders[0]["senderOrderId"], "A-1");
    assert_eq!(partner_orders[1]["senderOrderId"], "A-2");
    assert_eq!(partner_orders[0]["undeliverableOption"], "UTILIZATION");
}

#[tokio::test]
async fn add_warehouses_sends_the_list_verbatim() {
    let spy = SpyTransport::new();
    let client = authenticated_client(&spy).await;
    spy.respond(200, json!([{ "partnerLocationId": "WH-001", "id": "uuid-1" }]));

    let warehouses = vec![Warehouse {
        partner_location_id: "WH-001".to_string(),
        name: "Склад Север".to_string(),
        region_code: "77".to_string(),
        federal_district: "Центральный".to_string(),
        region: "Москва".to_string(),
        index: "127000".to_string(),
        city: "Москва".to_string(),
        street: "Ленина".to_string(),
        house_number: "1".to_string(),
        coordinates: "55.75, 37.61".to_string(),
        contact_phone_number: "+74950000000".to_string(),
        time_zone: "+03:00".to_string(),
        working_time: vec![],
    }];

    let response = client.add_warehouses(&warehouses).await.unwrap();
    assert_eq!(response[0]["id"], "uuid-1");

    let requests = spy.requests();
    assert_eq!(requests[0].path, "/api/v1/warehouse");
    let body: Value = serde_json::from_str(&requests[0].body.as_ref().unwrap().content).unwrap();
    assert_eq!(body, serde_json::to_value(&warehouses).unwrap());
}

#[tokio::test]
async fn cancel_order_uses_delete_with_the_id_in_the_path() {
    let spy = SpyTransport::new();
    let client = authenticated_client(&spy).await;
    spy.respond(200, json!({ "status": "OK" }));

    client.cancel_order("ORDER 7/1").await.unwrap();

    let requests = spy.requests();
    assert_eq!(requests[0].method, HttpMethod::Delete);
    assert_eq!(requests[0].path, "/api/v1/cancelOrder/ORDER%207%2F1");
    assert!(requests[0].query.is_none());
    assert!(requests[0].body.is_none());

    assert!(matches!(
        client.cancel_order("").await,
        Err(ApiError::InvalidInput(_))
    ));
    assert_eq!(spy.requests().len(), 1);
}

#[tokio::test]
async fn orders_status_maps_identifiers_per_item() {
    let spy = SpyTransport::new();
    let client = authenticated_client(&spy).await;
    spy.respond(200, json!([{ "orderId": "V-1", "status": "APPROVED" }]));

    let references = vec![
        OrderReference::by_vendor_id("V-1"),
        OrderReference::by_order_id("S-2"),
    ];
    client.get_orders_status(&references).await.unwrap();

    let requests = spy.requests();
    assert_eq!(requests[0].path, "/api/v1/getOrderStatus");
    let body: Value = serde_json::from_str(&requests[0].body.as_ref().unwrap().content).unwrap();
    assert_eq!(body, json!([{ "orderId": "V-1" }, { "senderOrderId": "S-2" }]));
}

#[tokio::test]
async fn invalid_identifiers_fail_before_any_network_call() {
    let spy = SpyTransport::new();
    let client = client_with(&spy);

    let batch = client
        .get_orders_status(&[
            OrderReference::by_order_id("S-1"),
            OrderReference::new(Some(String::new()), None),
        ])
        .await;
    match batch {
        Err(ApiError::InvalidInput(message)) => assert!(message.contains("índice 1")),
        other => panic!("unexpected result: {:?}", other),
    }

    let history = client
        .get_order_status_history(&OrderReference::default())
        .await;
    assert!(matches!(history, Err(ApiError::InvalidInput(_))));

    assert!(spy.requests().is_empty());
}

#[tokio::test]
async fn order_history_sends_a_single_query() {
    let spy = SpyTransport::new();
    let client = authenticated_client(&spy).await;
    spy.respond(200, json!([{ "status": "NEW" }]));

    client
        .get_order_status_history(&OrderReference::new(
            Some("S-1".to_string()),
            Some("V-1".to_string()),
        ))
        .await
        .unwrap();

    let requests = spy.requests();
    assert_eq!(requests[0].path, "/api/v1/getOrderHistory");
    let body: Value = serde_json::from_str(&requests[0].body.as_ref().unwrap().content).unwrap();
    assert_eq!(body, json!({ "orderId": "V-1", "senderOrderId": "S-1" }));
}

#[tokio::test]
async fn remote_failures_are_normalized() {
    let spy = SpyTransport::new();
    let client = authenticated_client(&spy).await;
    spy.respond(500, json!({}));
    spy.respond(401, json!({ "fault": { "faultstring": "bad token" } }));
    spy.respond(200, json!({ "status": "ERROR", "description": "dup", "id": "42" }));

    let empty = client.cancel_order("1").await.unwrap_err();
    let remote = empty.as_remote().unwrap();
    assert_eq!(remote.kind, RemoteErrorKind::EmptyResponse);
    assert_eq!(remote.status, 500);
    assert_eq!(remote.raw_body, "{}");
    assert!(remote.raw_request.starts_with("DELETE /api/v1/cancelOrder/1"));

    let fault = client.cancel_order("1").await.unwrap_err();
    assert_eq!(fault.as_remote().unwrap().kind, RemoteErrorKind::Fault);
    assert!(fault.to_string().contains("bad token"));

    let business = client.create_orders(&[sample_order("A-1")]).await.unwrap_err();
    let remote = business.as_remote().unwrap();
    assert_eq!(remote.kind, RemoteErrorKind::Business);
    assert!(remote.message.contains("dup") && remote.message.contains("42"));
    assert!(remote.raw_request.contains("partnerOrders"));
}

#[tokio::test]
async fn transport_errors_propagate_untranslated() {
    let spy = SpyTransport::new();
    let client = authenticated_client(&spy).await;
    spy.fail("connection refused");

    match client.cancel_order("1").await {
        Err(ApiError::Transport(TransportError::Other(message))) => {
            assert_eq!(message, "connection refused")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn configured_timeout_reaches_the_transport() {
    let spy = SpyTransport::new();
    init_logging();
    let client = ApiClient::builder(ClientConfig::new("key").with_timeout_secs(7))
        .transport(spy.clone())
        .build()
        .unwrap();
    client.set_token(test_token()).await;
    spy.respond(200, json!({ "status": "OK" }));

    client.cancel_order("1").await.unwrap();
    assert_eq!(spy.timeouts(), vec![Duration::from_secs(7)]);
}

#[tokio::test]
async fn logger_receives_one_line_before_and_one_after() {
    let spy = SpyTransport::new();
    let logger = Arc::new(RecordingLogger::default());
    init_logging();
    let client = ApiClient::builder(ClientConfig::new("key"))
        .transport(spy.clone())
        .logger(logger.clone())
        .build()
        .unwrap();
    client.set_token(test_token()).await;
    spy.respond(200, json!({ "status": "OK", "result": [] }));

    client
        .get_order_status_history(&OrderReference::by_order_id("S-1"))
        .await
        .unwrap();

    let lines = logger.lines.lock().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].0, "POST /api/v1/getOrderHistory");
    assert!(lines[0].1["request"]
        .as_str()
        .unwrap()
        .contains("senderOrderId"));
    assert!(lines[1].0.starts_with("POST /api/v1/getOrderHistory"));
    assert!(lines[1].0.contains("\"result\""));
    assert_eq!(lines[1].1["status"], 200);
    assert!(lines[1].1["headers"].is_object());
}

#[test]
fn empty_api_key_is_rejected() {
    assert!(matches!(
        ApiClient::builder(ClientConfig::new("")).build(),
        Err(ApiError::Config(_))
    ));
}
