//! Cart and order integration tests.
//!
//! Requires a migrated database and a running API server.

use reqwest::StatusCode;
use serde_json::{Value, json};

use websale_integration_tests::{client, create_product, register_customer, url};

fn amount(value: &Value) -> f64 {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("not a decimal string: {value}"))
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cart_merges_lines_and_totals() {
    let client = client();
    let (_, customer) = register_customer(&client).await;
    let customer_id = &customer["id"];
    let product = create_product(&client, "10.00").await;

    for quantity in [2, 3] {
        let resp = client
            .post(url(&format!("/api/cart/{customer_id}/items")))
            .json(&json!({ "productId": product["id"], "quantity": quantity }))
            .send()
            .await
            .expect("Failed to add item");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let cart: Value = client
        .get(url(&format!("/api/cart/{customer_id}")))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Invalid JSON");

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["items"][0]["quantity"], 5);
    assert_eq!(cart["totalItems"], 5);
    assert!((amount(&cart["totalAmount"]) - 50.0).abs() < 1e-9);

    let resp = client
        .put(url(&format!(
            "/api/cart/{customer_id}/items/{}",
            product["id"]
        )))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("Failed to update item");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_removing_missing_item_is_404() {
    let client = client();
    let (_, customer) = register_customer(&client).await;

    let resp = client
        .delete(url(&format!(
            "/api/cart/{}/items/2147483000",
            customer["id"]
        )))
        .send()
        .await
        .expect("Failed to remove item");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_totals_status_flow_and_cart_clear() {
    let client = client();
    let (email, customer) = register_customer(&client).await;
    let customer_id = &customer["id"];
    let product = create_product(&client, "50.00").await;

    client
        .post(url(&format!("/api/cart/{customer_id}/items")))
        .json(&json!({ "productId": product["id"], "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add item");

    let resp = client
        .post(url("/api/orders"))
        .json(&json!({
            "customerId": customer_id,
            "items": [{ "productId": product["id"], "quantity": 2 }],
            "shippingAddress": {
                "firstName": "Ada",
                "lastName": "Tester",
                "street": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "zipCode": "62701",
                "country": "US",
                "phone": "+15551234567"
            },
        }))
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("Invalid JSON");

    // 100.00 is not above the free shipping threshold
    assert!((amount(&order["subtotal"]) - 100.0).abs() < 1e-9);
    assert!((amount(&order["taxAmount"]) - 18.0).abs() < 1e-9);
    assert!((amount(&order["shippingCost"]) - 15.0).abs() < 1e-9);
    assert!((amount(&order["totalAmount"]) - 133.0).abs() < 1e-9);
    assert_eq!(order["status"], "created");
    assert_eq!(order["paymentMethod"], "credit_card");
    assert_eq!(order["customerEmail"], email.as_str());
    assert_eq!(order["items"][0]["sku"], product["sku"]);

    let cart: Value = client
        .get(url(&format!("/api/cart/{customer_id}")))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));

    let order_id = &order["id"];
    let resp = client
        .put(url(&format!("/api/orders/{order_id}/status")))
        .json(&json!({ "status": "delivered" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    for status in ["approved", "shipped"] {
        let resp = client
            .put(url(&format!("/api/orders/{order_id}/status")))
            .json(&json!({ "status": status }))
            .send()
            .await
            .expect("Failed to update status");
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: Value = resp.json().await.expect("Invalid JSON");
        assert_eq!(updated["status"], status);
    }

    let shipped: Value = client
        .get(url(&format!("/api/orders/{order_id}")))
        .send()
        .await
        .expect("Failed to get order")
        .json()
        .await
        .expect("Invalid JSON");
    assert!(shipped["shippedAt"].is_string());
    assert!(shipped["deliveredAt"].is_null());

    let resp = client
        .put(url(&format!("/api/orders/{order_id}/status")))
        .json(&json!({ "status": "lost" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let listed: Value = client
        .get(url("/api/orders"))
        .query(&[("customerId", customer_id.to_string())])
        .send()
        .await
        .expect("Failed to list orders")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(listed["totalCount"], 1);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_for_unknown_customer_is_404() {
    let client = client();
    let product = create_product(&client, "5.00").await;

    let resp = client
        .post(url("/api/orders"))
        .json(&json!({
            "customerId": 2_147_483_000,
            "items": [{ "productId": product["id"], "quantity": 1 }],
        }))
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

async fn place_order(client: &reqwest::Client, body: &Value) -> reqwest::Response {
    client
        .post(url("/api/orders"))
        .json(body)
        .send()
        .await
        .expect("Failed to create order")
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_repeated_products_become_one_order_line() {
    let client = client();
    let (_, customer) = register_customer(&client).await;
    let product = create_product(&client, "4.00").await;

    let resp = place_order(
        &client,
        &json!({
            "customerId": customer["id"],
            "items": [
                { "productId": product["id"], "quantity": 2 },
                { "productId": product["id"], "quantity": 3 },
            ],
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("Invalid JSON");

    assert_eq!(order["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(order["items"][0]["quantity"], 5);
    assert!((amount(&order["subtotal"]) - 20.0).abs() < 1e-9);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_total_beyond_storable_amount_is_400() {
    let client = client();
    let (_, customer) = register_customer(&client).await;
    let product = create_product(&client, "9999999999.99").await;

    let resp = place_order(
        &client,
        &json!({
            "customerId": customer["id"],
            "items": [{ "productId": product["id"], "quantity": 1 }],
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["error"], "order total cannot exceed 9999999999.99");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_blank_status_notes_keep_existing_notes() {
    let client = client();
    let (_, customer) = register_customer(&client).await;
    let product = create_product(&client, "8.00").await;

    let order: Value = place_order(
        &client,
        &json!({
            "customerId": customer["id"],
            "items": [{ "productId": product["id"], "quantity": 1 }],
            "notes": "Ring twice",
        }),
    )
    .await
    .json()
    .await
    .expect("Invalid JSON");

    let resp = client
        .put(url(&format!("/api/orders/{}/status", order["id"])))
        .json(&json!({ "status": "approved", "notes": "  " }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(updated["status"], "approved");
    assert_eq!(updated["notes"], "Ring twice");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_checkout_racing_cart_add_never_restores_bought_line() {
    let client = client();
    let bought = create_product(&client, "3.00").await;
    let extra = create_product(&client, "1.00").await;

    for _ in 0..10 {
        let (_, customer) = register_customer(&client).await;
        let customer_id = &customer["id"];
        client
            .post(url(&format!("/api/cart/{customer_id}/items")))
            .json(&json!({ "productId": bought["id"], "quantity": 1 }))
            .send()
            .await
            .expect("Failed to add item");

        let order = json!({
            "customerId": customer_id,
            "items": [{ "productId": bought["id"], "quantity": 1 }],
        });
        let add = client
            .post(url(&format!("/api/cart/{customer_id}/items")))
            .json(&json!({ "productId": extra["id"], "quantity": 1 }))
            .send();
        let (placed, added) = tokio::join!(place_order(&client, &order), add);
        assert_eq!(placed.status(), StatusCode::CREATED);
        assert_eq!(added.expect("Failed to add item").status(), StatusCode::OK);

        let cart: Value = client
            .get(url(&format!("/api/cart/{customer_id}")))
            .send()
            .await
            .expect("Failed to get cart")
            .json()
            .await
            .expect("Invalid JSON");
        let lines = cart["items"].as_array().expect("items array");
        assert!(
            lines.iter().all(|line| line["productId"] != bought["id"]),
            "checked-out line is back in the cart: {cart}"
        );
    }
}
