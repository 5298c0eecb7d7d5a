//! Integration tests for the WebSale API.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the API against a scratch database
//! ws-cli migrate
//! cargo run -p websale-api
//!
//! # Run the ignored integration tests
//! cargo test -p websale-integration-tests -- --ignored
//! ```
//!
//! `WEBSALE_TEST_URL` overrides the default `http://localhost:5001`.
//!
//! Every helper creates uniquely named records, so tests can run repeatedly
//! against the same database.

#![allow(clippy::missing_panics_doc)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL of the running API.
#[must_use]
pub fn base_url() -> String {
    std::env::var("WEBSALE_TEST_URL").unwrap_or_else(|_| "http://localhost:5001".to_string())
}

/// Absolute URL for an API path such as `/api/products`.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// HTTP client that keeps the session cookie between requests.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// SKU that will not collide with earlier runs.
#[must_use]
pub fn unique_sku(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{prefix}-{}", suffix.get(..12).unwrap_or(&suffix))
}

/// Email that will not collide with earlier runs.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}

/// Create an active product priced at `price` and return its JSON.
pub async fn create_product(client: &Client, price: &str) -> Value {
    let resp = client
        .post(url("/api/products"))
        .json(&json!({
            "name": "Integration Widget",
            "description": "Created by the integration suite",
            "price": price,
            "sku": unique_sku("IT"),
            "category": "Testing",
            "brand": "WebSale",
            "images": ["https://cdn.example.com/widget.png"],
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Invalid product JSON")
}

/// Register a customer with password `secret123` and return
/// `(email, customer JSON)`.
pub async fn register_customer(client: &Client) -> (String, Value) {
    let email = unique_email();
    let resp = client
        .post(url("/api/customers/register"))
        .header("x-forwarded-for", format!("10.0.{}.1", rand_octet()))
        .json(&json!({
            "email": email,
            "firstName": "Ada",
            "lastName": "Tester",
            "password": "secret123",
            "phone": "+15551234567",
        }))
        .send()
        .await
        .expect("Failed to register customer");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Invalid customer JSON");
    (email, body["customer"].clone())
}

/// Spread credential requests over several client addresses so the login
/// rate limiter does not trip during a full run.
#[must_use]
pub fn rand_octet() -> u8 {
    Uuid::new_v4().as_bytes().first().copied().unwrap_or_default()
}

/// Read a JSON string field, panicking with context if absent.
#[must_use]
pub fn str_field<'a>(value: &'a Value, field: &str) -> &'a str {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing string field {field} in {value}"))
}
