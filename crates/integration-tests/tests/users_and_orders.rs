//! Integration tests for accounts and order records.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p pomelo-api)
//!
//! Run with: cargo test -p pomelo-integration-tests -- --include-ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use pomelo_integration_tests::{api_base_url, create_product, signup_and_login};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn duplicate_signup_conflicts() {
    let client = Client::new();
    let user = signup_and_login(&client, "dup").await;

    let resp = client
        .post(format!("{}/api/users/signup", api_base_url()))
        .json(&json!({
            "name": "Someone Else",
            "email": user.email,
            "password": "a different password",
        }))
        .send()
        .await
        .expect("signup request failed");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn wrong_password_is_unauthorized() {
    let client = Client::new();
    let user = signup_and_login(&client, "badpass").await;

    let resp = client
        .post(format!("{}/api/users/login", api_base_url()))
        .json(&json!({ "email": user.email, "password": "not the password" }))
        .send()
        .await
        .expect("login request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn order_lifecycle() {
    let client = Client::new();
    let user = signup_and_login(&client, "orders").await;
    let product_id = create_product(&client, &user.token, "Ordered Kettle", "49.99").await;
    let base_url = api_base_url();

    // Create a pending order
    let resp = client
        .post(format!("{base_url}/api/users/{}/orders", user.id))
        .bearer_auth(&user.token)
        .json(&json!({
            "items": [{ "product_id": product_id, "quantity": 2 }],
            "total": "99.98",
        }))
        .send()
        .await
        .expect("create order failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("order body was not JSON");
    assert_eq!(order["status"].as_str(), Some("pending"));
    let order_id = order["id"].as_i64().expect("order id missing");

    // Mark it completed
    let resp = client
        .patch(format!("{base_url}/api/orders/{order_id}"))
        .bearer_auth(&user.token)
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .expect("patch order failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.expect("order body was not JSON");
    assert_eq!(order["status"].as_str(), Some("completed"));

    // It shows up in the user's history
    let resp = client
        .get(format!("{base_url}/api/users/{}/orders", user.id))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("order history failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let orders: Value = resp.json().await.expect("orders body was not JSON");
    assert!(
        orders
            .as_array()
            .expect("orders missing")
            .iter()
            .any(|o| o["id"].as_i64() == Some(order_id))
    );
}
