//! Inventory integration tests.
//!
//! Requires a migrated database and a running API server.

use reqwest::StatusCode;
use serde_json::{Value, json};

use websale_integration_tests::{client, create_product, url};

async fn post(client: &reqwest::Client, path: &str, body: Value) -> (StatusCode, Value) {
    let resp = client
        .post(url(path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = resp.status();
    let body = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_reserve_release_commit_lifecycle() {
    let client = client();
    let product = create_product(&client, "8.00").await;
    let product_id = &product["id"];

    let (status, item) = post(
        &client,
        "/api/inventory",
        json!({
            "productId": product_id,
            "sku": product["sku"],
            "quantity": 10,
            "cost": "4.00",
            "location": "WH-1",
            "minimumStock": 2,
            "maximumStock": 50,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["availableQuantity"], 10);

    let (status, _) = post(
        &client,
        "/api/inventory",
        json!({
            "productId": product_id,
            "sku": product["sku"],
            "quantity": 1,
            "cost": "4.00",
            "location": "WH-2",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let base = format!("/api/inventory/{product_id}");

    let (status, item) = post(&client, &format!("{base}/reserve"), json!({ "quantity": 8 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["reservedQuantity"], 8);
    assert_eq!(item["availableQuantity"], 2);
    assert_eq!(item["isLowStock"], true);

    let (status, body) = post(&client, &format!("{base}/reserve"), json!({ "quantity": 5 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, item) = post(&client, &format!("{base}/release"), json!({ "quantity": 3 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["reservedQuantity"], 5);

    let (status, item) = post(&client, &format!("{base}/commit"), json!({ "quantity": 5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["quantity"], 5);
    assert_eq!(item["reservedQuantity"], 0);

    let (status, item) = post(
        &client,
        &format!("{base}/adjust"),
        json!({ "quantity": -2, "reason": "damaged" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["quantity"], 3);

    let (status, _) = post(&client, &format!("{base}/adjust"), json!({ "quantity": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_low_stock_report_includes_short_items() {
    let client = client();
    let product = create_product(&client, "3.00").await;

    let (status, _) = post(
        &client,
        "/api/inventory",
        json!({
            "productId": product["id"],
            "sku": product["sku"],
            "quantity": 1,
            "cost": "1.00",
            "location": "WH-1",
            "minimumStock": 5,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let report: Value = client
        .get(url("/api/inventory/low-stock"))
        .send()
        .await
        .expect("Failed to get low stock")
        .json()
        .await
        .expect("Invalid JSON");
    let found = report["items"]
        .as_array()
        .is_some_and(|items| items.iter().any(|i| i["productId"] == product["id"]));
    assert!(found);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_invalid_inventory_input_is_400() {
    let client = client();
    let product = create_product(&client, "3.00").await;

    let (status, body) = post(
        &client,
        "/api/inventory",
        json!({
            "productId": product["id"],
            "sku": product["sku"],
            "quantity": -1,
            "cost": "1.00",
            "location": "",
            "minimumStock": 10,
            "maximumStock": 5,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|m| m.contains("maximumStock"))
    );
}
