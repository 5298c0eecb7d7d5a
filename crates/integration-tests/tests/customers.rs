//! Customer account integration tests.
//!
//! Requires a migrated database and a running API server.

use reqwest::StatusCode;
use serde_json::{Value, json};

use websale_integration_tests::{client, rand_octet, register_customer, str_field, url};

async fn login(client: &reqwest::Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(url("/api/customers/login"))
        .header("x-forwarded-for", format!("10.1.{}.1", rand_octet()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in")
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_login_me_logout() {
    let client = client();
    let (email, customer) = register_customer(&client).await;
    assert_eq!(customer["status"], "active");
    assert!(customer.get("passwordHash").is_none());

    let resp = login(&client, &email, "secret123").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(url("/api/customers/me"))
        .send()
        .await
        .expect("Failed to get me");
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(me["customer"]["email"], email.as_str());
    assert!(me["customer"]["lastLoginAt"].is_string());

    let resp = client
        .post(url("/api/customers/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(url("/api/customers/me"))
        .send()
        .await
        .expect("Failed to get me");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_email_conflicts() {
    let client = client();
    let (email, _) = register_customer(&client).await;

    let resp = client
        .post(url("/api/customers/register"))
        .header("x-forwarded-for", format!("10.2.{}.1", rand_octet()))
        .json(&json!({
            "email": email.to_uppercase(),
            "firstName": "Other",
            "lastName": "Person",
            "password": "secret123",
            "phone": "+15557654321",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wrong_password_and_blocked_customer_are_401() {
    let client = client();
    let (email, customer) = register_customer(&client).await;

    let resp = login(&client, &email, "wrong-password").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .put(url(&format!("/api/customers/{}/status", customer["id"])))
        .json(&json!({ "status": "blocked" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = login(&client, &email, "secret123").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_search_and_list() {
    let client = client();
    let (email, customer) = register_customer(&client).await;
    let local = email.split('@').next().unwrap_or(&email).to_uppercase();

    let found: Value = client
        .get(url("/api/customers/search"))
        .query(&[("q", local.as_str())])
        .send()
        .await
        .expect("Failed to search")
        .json()
        .await
        .expect("Invalid JSON");
    let ids: Vec<&Value> = found["customers"]
        .as_array()
        .map(|c| c.iter().map(|c| &c["id"]).collect())
        .unwrap_or_default();
    assert!(ids.contains(&&customer["id"]));

    let listed: Value = client
        .get(url("/api/customers"))
        .send()
        .await
        .expect("Failed to list")
        .json()
        .await
        .expect("Invalid JSON");
    let entry = listed["customers"]
        .as_array()
        .and_then(|c| c.iter().find(|c| c["id"] == customer["id"]))
        .expect("registered customer missing from list");
    assert_eq!(entry["totalOrders"], 0);
    assert_eq!(str_field(entry, "email"), email);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_weak_password_is_400() {
    let resp = client()
        .post(url("/api/customers/register"))
        .header("x-forwarded-for", format!("10.3.{}.1", rand_octet()))
        .json(&json!({
            "email": "weak@example.com",
            "firstName": "Weak",
            "lastName": "Password",
            "password": "12345",
            "phone": "+15551234567",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
