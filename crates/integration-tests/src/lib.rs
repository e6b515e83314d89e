//! Integration tests for Pomelo.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p pomelo-cli -- migrate
//!
//! # Start the API
//! cargo run -p pomelo-api
//!
//! # Run integration tests against it
//! cargo test -p pomelo-integration-tests -- --include-ignored
//! ```
//!
//! Tests target a running API instance; the base URL comes from the
//! `API_BASE_URL` environment variable and defaults to
//! `http://localhost:8000`.

use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// A signed-up test user with its bearer token.
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

/// Sign up a fresh user and log in, returning the account and token.
///
/// Email uniqueness comes from the process id and a caller-chosen tag, so
/// parallel tests don't collide.
///
/// # Panics
///
/// Panics if signup or login fails; these tests assume a clean, migrated
/// database behind the API.
pub async fn signup_and_login(client: &reqwest::Client, tag: &str) -> TestUser {
    let base_url = api_base_url();
    let email = format!("{tag}-{}@integration.test", std::process::id());

    let resp = client
        .post(format!("{base_url}/api/users/signup"))
        .json(&json!({
            "name": format!("Test {tag}"),
            "email": email,
            "password": "correct horse battery",
        }))
        .send()
        .await
        .expect("signup request failed");
    assert!(
        resp.status().is_success(),
        "signup failed: {}",
        resp.status()
    );

    let resp = client
        .post(format!("{base_url}/api/users/login"))
        .json(&json!({ "email": email, "password": "correct horse battery" }))
        .send()
        .await
        .expect("login request failed");
    assert!(resp.status().is_success(), "login failed: {}", resp.status());

    let body: Value = resp.json().await.expect("login body was not JSON");
    TestUser {
        id: body["user"]["id"].as_i64().expect("user id missing"),
        email,
        token: body["token"]
            .as_str()
            .expect("token missing")
            .to_string(),
    }
}

/// Create a catalog product, returning its id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(client: &reqwest::Client, token: &str, name: &str, price: &str) -> i64 {
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/products"))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "quantity": 10,
            "category": ["test"],
            "price": price,
            "image": "/images/test.jpg",
        }))
        .send()
        .await
        .expect("create product request failed");
    assert!(
        resp.status().is_success(),
        "create product failed: {}",
        resp.status()
    );

    let body: Value = resp.json().await.expect("product body was not JSON");
    body["id"].as_i64().expect("product id missing")
}
