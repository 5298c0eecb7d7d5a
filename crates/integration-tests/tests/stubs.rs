//! Payment, shipping and dashboard integration tests.
//!
//! Requires a migrated database and a running API server.

use reqwest::StatusCode;
use serde_json::{Value, json};

use websale_integration_tests::{client, str_field, url};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_health_endpoints() {
    let client = client();
    for path in ["/health", "/health/ready"] {
        let resp = client.get(url(path)).send().await.expect("Failed to get");
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_payment_process_then_lookup() {
    let client = client();
    let created: Value = client
        .post(url("/api/payments/process"))
        .json(&json!({ "amount": "42.00", "paymentMethod": "credit_card" }))
        .send()
        .await
        .expect("Failed to process payment")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(created["status"], "processing");

    let id = str_field(&created, "paymentId");
    let fetched: Value = client
        .get(url(&format!("/api/payments/{id}")))
        .send()
        .await
        .expect("Failed to get payment")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(fetched["status"], "completed");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_shipping_create_then_track() {
    let client = client();
    let created: Value = client
        .post(url("/api/shipping/create"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to create shipment")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(created["status"], "created");

    let id = str_field(&created, "shippingId");
    let first: Value = client
        .get(url(&format!("/api/shipping/{id}/track")))
        .send()
        .await
        .expect("Failed to track")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(first["status"], "in_transit");
    assert!(str_field(&first, "trackingNumber").starts_with("TR"));

    let second: Value = client
        .get(url(&format!("/api/shipping/{id}/track")))
        .send()
        .await
        .expect("Failed to track")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(first["trackingNumber"], second["trackingNumber"]);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_dashboard_stats_shape() {
    let stats: Value = client()
        .get(url("/api/dashboard/stats"))
        .send()
        .await
        .expect("Failed to get stats")
        .json()
        .await
        .expect("Invalid JSON");

    for field in ["totalProducts", "totalOrders", "totalCustomers", "ordersGrowth"] {
        assert!(stats[field].is_i64(), "{field}");
    }
    assert!(stats["totalRevenue"].is_string());
}
