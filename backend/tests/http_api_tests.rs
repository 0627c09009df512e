//! HTTP API tests
//!
//! Drives the full router against the in-memory store:
//! - Recording purchases and sales
//! - Structured error responses
//! - Listing, balances and reports

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use fish_ledger_backend::store::MemoryLedgerStore;
use fish_ledger_backend::{create_app, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_app(AppState::new(
        Arc::new(MemoryLedgerStore::new()),
        Config::default(),
    ))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    post_raw(app, uri, Some("application/json"), &payload.to_string()).await
}

fn purchase(fish: &str, quantity: f64, unit_price: f64, date: &str) -> Value {
    json!({
        "date": date,
        "supplierName": "North Pier Co-op",
        "supplierContact": "555-0110",
        "fishType": fish,
        "type": "IN",
        "quantity": quantity,
        "unitPrice": unit_price,
    })
}

fn sale(fish: &str, quantity: f64, unit_price: f64, date: &str) -> Value {
    json!({
        "date": date,
        "purchaserName": "Harbor Grill",
        "purchaserContact": "555-0101",
        "fishType": fish,
        "type": "OUT",
        "quantity": quantity,
        "unitPrice": unit_price,
    })
}

// ============================================================================
// Movements
// ============================================================================

#[cfg(test)]
mod movement_tests {
    use super::*;

    #[tokio::test]
    async fn test_purchase_then_sale() {
        let app = app();

        let payload = purchase("Pomfret", 100.0, 10.0, "2024-03-01");
        let (status, body) = post_json(&app, "/api/inventory", payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], "Inventory saved!");
        assert_eq!(body["balance"], json!(100.0));

        let payload = sale("Pomfret", 30.0, 12.0, "2024-03-02");
        let (status, body) = post_json(&app, "/api/salesRecord", payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Sale recorded successfully!");
        assert_eq!(body["total_price"], json!(360.0));
        assert_eq!(body["remaining_stock"], json!(70.0));
    }

    #[tokio::test]
    async fn test_insufficient_stock_response() {
        let app = app();

        let payload = purchase("Pomfret", 100.0, 10.0, "2024-03-01");
        post_json(&app, "/api/inventory", payload).await;
        let payload = sale("Pomfret", 30.0, 12.0, "2024-03-02");
        post_json(&app, "/api/salesRecord", payload).await;

        let payload = sale("Pomfret", 80.0, 12.0, "2024-03-03");
        let (status, body) = post_json(&app, "/api/salesRecord", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], "INSUFFICIENT_STOCK");
        assert_eq!(body["error"]["message"], "Insufficient stock. Available: 70");
        assert_eq!(body["error"]["available"], json!(70.0));

        let (_, balance) = get_json(&app, "/api/stock/Pomfret").await;
        assert_eq!(balance["quantity"], json!(70.0));
    }

    #[tokio::test]
    async fn test_missing_field_names_the_field() {
        let app = app();

        let mut payload = purchase("Pomfret", 10.0, 10.0, "2024-03-01");
        payload.as_object_mut().unwrap().remove("fishType");

        let (status, body) = post_json(&app, "/api/inventory", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "fishType");
        assert_eq!(body["error"]["message"], "Missing required field: fishType");

        let (_, movements) = get_json(&app, "/api/inventory").await;
        assert_eq!(movements, json!([]));
    }

    #[tokio::test]
    async fn test_wrong_type_on_sale_rejected() {
        let app = app();

        let mut payload = sale("Pomfret", 1.0, 1.0, "2024-03-01");
        payload["type"] = json!("IN");

        let (status, body) = post_json(&app, "/api/salesRecord", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "type");
    }

    #[tokio::test]
    async fn test_list_filter_and_limit() {
        let app = app();

        let payload = purchase("Tuna", 20.0, 6.0, "2024-03-01");
        post_json(&app, "/api/inventory", payload).await;
        post_json(&app, "/api/salesRecord", sale("Tuna", 2.0, 8.0, "2024-03-04")).await;
        post_json(&app, "/api/salesRecord", sale("Tuna", 3.0, 8.0, "2024-03-06")).await;

        let (status, all) = get_json(&app, "/api/inventory").await;
        assert_eq!(status, StatusCode::OK);
        let all = all.as_array().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0]["date"], "2024-03-06");
        assert_eq!(all[0]["counterpartyName"], "Harbor Grill");

        let (_, sales) = get_json(&app, "/api/inventory?type=OUT&limit=1").await;
        let sales = sales.as_array().unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0]["type"], "OUT");
        assert_eq!(sales[0]["quantity"], json!(3.0));
        assert!(sales[0].get("counterpartyName").is_none());

        let (status, body) = get_json(&app, "/api/inventory?type=SIDEWAYS").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "type");
    }
}

// ============================================================================
// Malformed requests
// ============================================================================

#[cfg(test)]
mod malformed_request_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_numeric_quantity_names_the_field() {
        let app = app();

        let mut payload = purchase("Pomfret", 1.0, 1.0, "2024-03-01");
        payload["quantity"] = json!("abc");

        let (status, body) = post_json(&app, "/api/inventory", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "quantity");

        let (_, movements) = get_json(&app, "/api/inventory").await;
        assert_eq!(movements, json!([]));
    }

    #[tokio::test]
    async fn test_empty_json_body_rejected() {
        let app = app();

        let (status, body) =
            post_raw(&app, "/api/salesRecord", Some("application/json"), "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "body");
    }

    #[tokio::test]
    async fn test_body_without_content_type_rejected() {
        let app = app();

        let (status, body) = post_raw(&app, "/api/inventory", None, "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "body");
    }

    #[tokio::test]
    async fn test_syntax_error_rejected() {
        let app = app();

        let (status, body) =
            post_raw(&app, "/api/inventory", Some("application/json"), "{\"date\":").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "body");
    }

    #[tokio::test]
    async fn test_non_numeric_limit_rejected() {
        let app = app();

        let (status, body) = get_json(&app, "/api/inventory?limit=many").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    /// Quantities whose total leaves the decimal range get a 400, not a dropped connection
    #[tokio::test]
    async fn test_out_of_range_total_rejected() {
        let app = app();

        let mut payload = purchase("Pomfret", 1.0, 1.0, "2024-03-01");
        payload["quantity"] = json!("100000000000000000000");
        payload["unitPrice"] = json!("100000000000000000000");

        let (status, body) = post_json(&app, "/api/inventory", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "quantity");

        let (_, balances) = get_json(&app, "/api/stock").await;
        assert_eq!(balances, json!([]));
    }
}

// ============================================================================
// Balances
// ============================================================================

#[cfg(test)]
mod balance_tests {
    use super::*;

    #[tokio::test]
    async fn test_fish_types_and_balances() {
        let app = app();

        let payload = purchase("Tuna", 20.0, 6.0, "2024-03-01");
        post_json(&app, "/api/inventory", payload).await;
        let payload = purchase("Anchovy", 5.0, 3.0, "2024-03-01");
        post_json(&app, "/api/inventory", payload).await;

        let (_, types) = get_json(&app, "/api/fish-types").await;
        assert_eq!(types, json!(["Anchovy", "Tuna"]));

        let (_, balances) = get_json(&app, "/api/stock").await;
        assert_eq!(balances.as_array().unwrap().len(), 2);
        assert_eq!(balances[1]["fish_type"], "Tuna");
        assert_eq!(balances[1]["quantity"], json!(20.0));

        let (status, unknown) = get_json(&app, "/api/stock/Salmon").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(unknown["quantity"], json!(0.0));
    }

    #[tokio::test]
    async fn test_reset_endpoint() {
        let app = app();

        let payload = purchase("Tuna", 20.0, 6.0, "2024-03-01");
        post_json(&app, "/api/inventory", payload).await;

        let (status, body) = post_json(&app, "/api/stock/reset", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (_, balance) = get_json(&app, "/api/stock/Tuna").await;
        assert_eq!(balance["quantity"], json!(0.0));

        let (_, movements) = get_json(&app, "/api/inventory").await;
        assert_eq!(movements.as_array().unwrap().len(), 1);
    }
}

// ============================================================================
// Reports
// ============================================================================

#[cfg(test)]
mod report_tests {
    use super::*;

    async fn seed(app: &Router) {
        let payload = purchase("Pomfret", 100.0, 10.0, "2024-01-03");
        post_json(app, "/api/inventory", payload).await;
        let payload = sale("Pomfret", 30.0, 12.0, "2024-02-02");
        post_json(app, "/api/salesRecord", payload).await;
    }

    #[tokio::test]
    async fn test_summary_and_trend() {
        let app = app();
        seed(&app).await;

        let (_, summary) = get_json(&app, "/api/sales/summary").await;
        assert_eq!(summary["total_sales"], json!(360.0));
        assert_eq!(summary["total_purchases"], json!(1000.0));
        assert_eq!(summary["profit"], json!(-640.0));
        assert_eq!(summary["total_transactions"], json!(2));

        let (_, trend) = get_json(&app, "/api/sales/monthly-trend").await;
        assert_eq!(
            trend,
            json!([
                { "month": "2024-02", "sales": 360.0 },
                { "month": "2024-01", "purchases": 1000.0 },
            ])
        );
    }

    #[tokio::test]
    async fn test_by_fish_csv_export() {
        let app = app();
        seed(&app).await;

        let request = Request::builder()
            .uri("/api/sales/by-fish?format=csv")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("fish_type,total_quantity,total_value"));
        assert!(text.contains("Pomfret"));
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();

        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "development");
        assert_eq!(body["database"], "connected");
    }
}
