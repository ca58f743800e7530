//! In-process stand-in for the sales service, served with tiny_http.

use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Response, Server};

/// Knobs for how the stub deviates from a healthy service.
#[derive(Debug, Clone)]
pub struct StubBehavior {
    pub records_total: u64,
    pub stats_total_orders: u64,
    /// Record returned in every page; `None` returns empty pages.
    pub record: Option<Value>,
    /// Extra latency per path.
    pub delays: HashMap<&'static str, Duration>,
    /// Answer every bad request with 500 instead of 400/404.
    pub crash_on_bad_input: bool,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            records_total: 42,
            stats_total_orders: 42,
            record: Some(healthy_record()),
            delays: HashMap::new(),
            crash_on_bad_input: false,
        }
    }
}

impl StubBehavior {
    /// Record whose `staffName` is replaced by a snake_case `staff_name`.
    pub fn with_snake_case_staff(mut self) -> Self {
        let mut record = healthy_record();
        if let Value::Object(map) = &mut record {
            let staff = map.remove("staffName").unwrap();
            map.insert("staff_name".to_string(), staff);
        }
        self.record = Some(record);
        self
    }

    /// Record carrying `staff_name` alongside the expected `staffName`.
    pub fn with_duplicate_snake_case_staff(mut self) -> Self {
        let mut record = healthy_record();
        if let Value::Object(map) = &mut record {
            let staff = map["staffName"].clone();
            map.insert("staff_name".to_string(), staff);
        }
        self.record = Some(record);
        self
    }

    pub fn with_delay(mut self, path: &'static str, delay: Duration) -> Self {
        self.delays.insert(path, delay);
        self
    }
}

pub fn healthy_record() -> Value {
    json!({
        "id": 1,
        "orderNumber": "SO-20240301-0001",
        "customerId": 7,
        "productId": 3,
        "salesStaffId": 11,
        "salesAmount": 1299.5,
        "quantity": 2,
        "unitPrice": 649.75,
        "orderDate": "2024-03-01",
        "status": "completed",
        "paymentStatus": "paid",
        "createdAt": "2024-03-01T10:00:00",
        "updatedAt": "2024-03-01T10:00:00",
        "customerName": "Acme Ltd",
        "productName": "Robot Arm",
        "staffName": "Lee",
        "discountAmount": null,
        "region": "north",
        "channel": "online"
    })
}

fn envelope(code: u16, data: Value) -> Value {
    json!({"code": code, "message": if code < 300 { "success" } else { "error" }, "data": data})
}

fn chart() -> Value {
    json!({
        "categories": ["2024-03-01", "2024-03-02"],
        "series": [{"name": "sales", "data": [10, 12]}]
    })
}

fn route(behavior: &StubBehavior, url: &str) -> (u16, Value) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let params: HashMap<&str, &str> = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .collect();
    let bad = if behavior.crash_on_bad_input { 500 } else { 400 };
    let invalid_date = params.get("startDate") == Some(&"invalid-date");

    match path {
        "/api/sales/records" => {
            let page = params.get("page").and_then(|p| p.parse::<i64>().ok()).unwrap_or(1);
            let size = params
                .get("pageSize")
                .and_then(|p| p.parse::<i64>().ok())
                .unwrap_or(20);
            if page < 1 || size < 1 || invalid_date {
                return (bad, envelope(bad, Value::Null));
            }
            let list: Vec<Value> = behavior.record.iter().cloned().collect();
            (
                200,
                envelope(
                    200,
                    json!({
                        "list": list,
                        "total": behavior.records_total,
                        "page": page,
                        "pageSize": size,
                        "totalPages": 3
                    }),
                ),
            )
        }
        "/api/sales/stats" => {
            if invalid_date {
                return (bad, envelope(bad, Value::Null));
            }
            (
                200,
                envelope(
                    200,
                    json!({
                        "totalSalesAmount": 54321.0,
                        "totalOrders": behavior.stats_total_orders,
                        "avgOrderAmount": 1293.4,
                        "totalQuantity": 88,
                        "newCustomers": 5,
                        "activeCustomers": 17,
                        "growthRate": 0.12
                    }),
                ),
            )
        }
        "/api/sales/charts/trends" => (200, envelope(200, chart())),
        "/api/sales/charts/distribution" => match params.get("type") {
            Some(&("product" | "region" | "channel")) => (200, envelope(200, chart())),
            _ => (bad, envelope(bad, Value::Null)),
        },
        _ => {
            let status = if behavior.crash_on_bad_input { 500 } else { 404 };
            (status, envelope(status, Value::Null))
        }
    }
}

/// A request as the stub received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedRequest {
    pub method: String,
    /// Path and query.
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Running stub; stops when dropped.
pub struct StubService {
    base_url: String,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StubService {
    pub fn healthy() -> Self {
        Self::start(StubBehavior::default())
    }

    pub fn start(behavior: StubBehavior) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                for mut request in server.incoming_requests() {
                    let url = request.url().to_string();
                    let content_type = request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("Content-Type"))
                        .map(|h| h.value.as_str().to_string());
                    let mut body = String::new();
                    let _ = request.as_reader().read_to_string(&mut body);
                    requests.lock().unwrap().push(ReceivedRequest {
                        method: request.method().to_string(),
                        url: url.clone(),
                        content_type,
                        body,
                    });
                    let path = url.split('?').next().unwrap_or_default();
                    if let Some(delay) = behavior.delays.get(path) {
                        thread::sleep(*delay);
                    }
                    let (status, body) = route(&behavior, &url);
                    let response = Response::from_string(body.to_string())
                        .with_status_code(status)
                        .with_header(
                            Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                                .unwrap(),
                        );
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            base_url: format!("http://{addr}"),
            server,
            handle: Some(handle),
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request targets (path and query) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.received().into_iter().map(|r| r.url).collect()
    }

    /// Full requests in arrival order.
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubService {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Serve a single canned response, then stop.
pub fn serve_once(status: u16, body: &'static str, delay: Duration) -> (String, JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        if let Ok(request) = server.recv() {
            thread::sleep(delay);
            let _ = request.respond(Response::from_string(body).with_status_code(status));
        }
    });
    (format!("http://{addr}"), handle)
}
