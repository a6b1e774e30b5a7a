//! Router-level tests exercising the HTTP surface end to end against an
//! in-memory database: JSON shapes, status codes, and the error body format.

mod common;

use autoshop_api::{app_router, config::AppConfig, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let pool = common::test_pool().await;
        let state = AppState::new(pool, AppConfig::default());
        Self {
            router: app_router(state),
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        let request = match body {
            Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

async fn seed_booking_over_http(app: &TestApp) -> i64 {
    let response = app
        .request(
            Method::POST,
            "/api/clients",
            Some(json!({
                "full_name": "Анна Смирнова",
                "phone": "+7 911 222-33-44"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let client_id = response_json(response).await["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/cars",
            Some(json!({
                "client_id": client_id,
                "brand": "Lada",
                "model": "Vesta",
                "plate_number": "В777ОР77"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let car_id = response_json(response).await["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(json!({
                "client_id": client_id,
                "car_id": car_id,
                "scheduled_at": (Utc::now() + Duration::days(2)).to_rfc3339()
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "ok");

    let response = app.request(Method::GET, "/health/db", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["database"], "up");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = response_json(response).await;
    assert!(doc["paths"]["/api/work-orders"].is_object());
}

#[tokio::test]
async fn full_work_order_flow_over_http() {
    let app = TestApp::new().await;
    let booking_id = seed_booking_over_http(&app).await;

    // open the work order
    let response = app
        .request(
            Method::POST,
            "/api/work-orders",
            Some(json!({ "booking_id": booking_id, "description": "ТО-1" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = response_json(response).await;
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order["status"], "created");

    // a second one conflicts
    let response = app
        .request(
            Method::POST,
            "/api/work-orders",
            Some(json!({ "booking_id": booking_id })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // labor and material
    let response = app
        .request(
            Method::POST,
            &format!("/api/work-orders/{order_id}/work-items"),
            Some(json!({ "name": "Замена масла", "unit_price": 2500 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["item"]["name"], "Замена масла");

    let response = app
        .request(
            Method::POST,
            &format!("/api/work-orders/{order_id}/material-items"),
            Some(json!({ "name": "Масло 5W-30", "qty": 4, "unit_price": 800 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let total: f64 = decimal_field(&body["totals"]["total_amount"]);
    assert_eq!(total, 5700.0);

    // pay in full
    let response = app
        .request(
            Method::POST,
            &format!("/api/work-orders/{order_id}/payments"),
            Some(json!({ "amount": 5700, "method": "card" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["payment"]["status"], "paid");
    let paid: f64 = decimal_field(&body["work_order"]["paid_amount"]);
    assert_eq!(paid, 5700.0);

    // aggregate view carries everything, audit in order
    let response = app
        .request(Method::GET, &format!("/api/work-orders/{order_id}/full"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let full = response_json(response).await;
    assert_eq!(full["work_items"].as_array().unwrap().len(), 1);
    assert_eq!(full["material_items"].as_array().unwrap().len(), 1);
    assert_eq!(full["payments"].as_array().unwrap().len(), 1);
    let actions: Vec<&str> = full["audit_log"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        actions,
        ["create", "add_work_item", "add_material_item", "payment"]
    );
}

#[tokio::test]
async fn status_endpoint_enforces_transitions() {
    let app = TestApp::new().await;
    let booking_id = seed_booking_over_http(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/work-orders",
            Some(json!({ "booking_id": booking_id })),
        )
        .await;
    let order_id = response_json(response).await["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PATCH,
            &format!("/api/work-orders/{order_id}/status"),
            Some(json!({ "status": "in_progress" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "in_progress");

    // illegal jump
    let response = app
        .request(
            Method::PATCH,
            &format!("/api/work-orders/{order_id}/status"),
            Some(json!({ "status": "closed" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // unknown value
    let response = app
        .request(
            Method::PATCH,
            &format!("/api/work-orders/{order_id}/status"),
            Some(json!({ "status": "finished" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn errors_use_the_standard_body_shape() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/work-orders/9999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().is_some());
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn client_and_car_crud_over_http() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/clients",
            Some(json!({ "full_name": "Пётр Сидоров", "phone": "+7 900 000-00-01", "email": "p@example.com" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let client_id = response_json(response).await["id"].as_i64().unwrap();

    // blank required field
    let response = app
        .request(
            Method::POST,
            "/api/clients",
            Some(json!({ "full_name": "  ", "phone": "+7 900 000-00-02" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // patch with explicit null clears the email
    let response = app
        .request(
            Method::PATCH,
            &format!("/api/clients/{client_id}"),
            Some(json!({ "full_name": "Пётр Сидоров", "phone": "+7 900 000-00-01", "email": null })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_json(response).await["email"].is_null());

    // archive hides from listing
    let response = app
        .request(Method::DELETE, &format!("/api/clients/{client_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.request(Method::GET, "/api/clients", None).await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 0);

    let response = app
        .request(Method::GET, &format!("/api/clients/{client_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Decimals serialize as JSON strings; tolerate plain numbers as well.
fn decimal_field(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.as_f64().unwrap(),
        other => panic!("not a decimal value: {other:?}"),
    }
}
