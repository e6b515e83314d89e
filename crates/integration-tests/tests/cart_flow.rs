//! Integration tests for the cart lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p pomelo-api)
//!
//! Run with: cargo test -p pomelo-integration-tests -- --include-ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use pomelo_integration_tests::{api_base_url, create_product, signup_and_login};

fn client() -> Client {
    Client::new()
}

async fn cart_view(client: &Client, user_id: i64, token: &str) -> Value {
    let resp = client
        .get(format!("{}/api/users/{user_id}/cart", api_base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("cart body was not JSON")
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn add_accumulates_quantity_on_the_same_line() {
    let client = client();
    let user = signup_and_login(&client, "accumulate").await;
    let product_id = create_product(&client, &user.token, "Accumulate Kettle", "50.00").await;
    let url = format!("{}/api/users/{}/cart", api_base_url(), user.id);

    for quantity in [2, 3] {
        let resp = client
            .post(&url)
            .bearer_auth(&user.token)
            .json(&json!({ "product_id": product_id, "quantity": quantity }))
            .send()
            .await
            .expect("add request failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let view = cart_view(&client, user.id, &user.token).await;
    let items = view["items"].as_array().expect("items missing");
    let line = items
        .iter()
        .find(|i| i["product_id"].as_i64() == Some(product_id))
        .expect("line missing");

    // 2 + 3 accumulated into one line, priced at the live catalog price
    assert_eq!(line["quantity"].as_u64(), Some(5));
    assert_eq!(line["total_price"].as_str(), Some("250.00"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn set_quantity_never_creates_a_line() {
    let client = client();
    let user = signup_and_login(&client, "set-qty").await;
    let product_id = create_product(&client, &user.token, "Phantom Teapot", "10.00").await;
    let url = format!("{}/api/users/{}/cart", api_base_url(), user.id);

    // The product was never added to the cart
    let resp = client
        .patch(&url)
        .bearer_auth(&user.token)
        .json(&json!({ "product_id": product_id, "quantity": 4 }))
        .send()
        .await
        .expect("patch request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("patch body was not JSON");
    assert_eq!(body["modified"].as_u64(), Some(0));

    let view = cart_view(&client, user.id, &user.token).await;
    assert!(view["items"].as_array().expect("items missing").is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn zero_quantity_patch_is_rejected() {
    let client = client();
    let user = signup_and_login(&client, "zero-qty").await;
    let url = format!("{}/api/users/{}/cart", api_base_url(), user.id);

    let resp = client
        .patch(&url)
        .bearer_auth(&user.token)
        .json(&json!({ "product_id": 1, "quantity": 0 }))
        .send()
        .await
        .expect("patch request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn oversized_quantity_is_rejected() {
    let client = client();
    let user = signup_and_login(&client, "oversized").await;
    let product_id = create_product(&client, &user.token, "Bulk Kettle", "50.00").await;
    let url = format!("{}/api/users/{}/cart", api_base_url(), user.id);

    // Past the per-line cap; must fail up front, not clamp or overflow
    let resp = client
        .post(&url)
        .bearer_auth(&user.token)
        .json(&json!({ "product_id": product_id, "quantity": 1_000_001u32 }))
        .send()
        .await
        .expect("add request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .patch(&url)
        .bearer_auth(&user.token)
        .json(&json!({ "product_id": product_id, "quantity": u32::MAX }))
        .send()
        .await
        .expect("patch request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let view = cart_view(&client, user.id, &user.token).await;
    assert!(view["items"].as_array().expect("items missing").is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn remove_is_idempotent() {
    let client = client();
    let user = signup_and_login(&client, "remove").await;
    let product_id = create_product(&client, &user.token, "Removable Mug", "9.99").await;
    let url = format!("{}/api/users/{}/cart", api_base_url(), user.id);

    let resp = client
        .post(&url)
        .bearer_auth(&user.token)
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("add request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Remove twice; the second remove targets an absent line
    for _ in 0..2 {
        let resp = client
            .delete(&url)
            .bearer_auth(&user.token)
            .json(&json!({ "product_id": product_id }))
            .send()
            .await
            .expect("delete request failed");
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = resp.json().await.expect("delete body was not JSON");
        assert!(body["items"].as_array().expect("items missing").is_empty());
    }
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn deleted_product_drops_out_of_the_cart_view() {
    let client = client();
    let user = signup_and_login(&client, "orphan").await;
    let keep_id = create_product(&client, &user.token, "Kept Kettle", "20.00").await;
    let doomed_id = create_product(&client, &user.token, "Doomed Teapot", "30.00").await;
    let base_url = api_base_url();
    let cart_url = format!("{base_url}/api/users/{}/cart", user.id);

    for product_id in [keep_id, doomed_id] {
        let resp = client
            .post(&cart_url)
            .bearer_auth(&user.token)
            .json(&json!({ "product_id": product_id }))
            .send()
            .await
            .expect("add request failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = client
        .delete(format!("{base_url}/api/products/{doomed_id}"))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("product delete failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The orphaned line is dropped from the view, not surfaced as an error
    let view = cart_view(&client, user.id, &user.token).await;
    let ids: Vec<i64> = view["items"]
        .as_array()
        .expect("items missing")
        .iter()
        .filter_map(|i| i["product_id"].as_i64())
        .collect();
    assert_eq!(ids, vec![keep_id]);
    assert_eq!(view["subtotal"].as_str(), Some("20.00"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn empty_cart_checkout_is_rejected() {
    let client = client();
    let user = signup_and_login(&client, "empty-checkout").await;

    let resp = client
        .post(format!(
            "{}/api/users/{}/cart/checkout",
            api_base_url(),
            user.id
        ))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("checkout request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn cart_requires_a_matching_token() {
    let client = client();
    let user = signup_and_login(&client, "owner-a").await;
    let other = signup_and_login(&client, "owner-b").await;
    let url = format!("{}/api/users/{}/cart", api_base_url(), user.id);

    // No token at all
    let resp = client.get(&url).send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Someone else's token
    let resp = client
        .get(&url)
        .bearer_auth(&other.token)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
