//! Integration tests for the product catalog.
//!
//! Run with: cargo test -p arluxe-integration-tests

#![allow(clippy::unwrap_used)]

use arluxe_integration_tests::TestApp;
use reqwest::StatusCode;
use serde_json::{Value, json};

// ============================================================================
// Public Reads
// ============================================================================

#[tokio::test]
async fn test_list_seed_catalog() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/products")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(products.len(), 10);

    let first = &products[0];
    assert_eq!(first["id"], "reef-33");
    assert_eq!(first["name"], "REEF 33");
    assert_eq!(first["price"], 3500.0);
    assert_eq!(first["discountPercent"], 0.0);
    assert_eq!(first["isNew"], true);
    assert_eq!(first["category"], "Premium Category");
}

#[tokio::test]
async fn test_get_product() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/products/officer-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let product: Value = resp.json().await.unwrap();
    assert_eq!(product["name"], "OFFICER");

    let resp = app
        .client
        .get(app.url("/products/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product not found");
}

// ============================================================================
// Admin Writes
// ============================================================================

#[tokio::test]
async fn test_writes_require_admin() {
    let app = TestApp::spawn().await;
    let customer = app.customer_token().await;

    let anonymous = app
        .client
        .post(app.url("/products"))
        .json(&json!({ "name": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forbidden = app
        .client
        .delete(app.url("/products/reef-33"))
        .bearer_auth(&customer)
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    let body: Value = forbidden.json().await.unwrap();
    assert_eq!(body["message"], "Admin access required");

    // Catalog unchanged
    let products: Vec<Value> = app
        .client
        .get(app.url("/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products.len(), 10);
}

#[tokio::test]
async fn test_create_coerces_and_prepends() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let resp = app
        .client
        .post(app.url("/products"))
        .bearer_auth(&admin)
        .json(&json!({
            "id": "chosen-by-client",
            "name": "NOIR",
            "price": "2750",
            "discountPercent": 150,
            "isNew": "yes"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    assert_ne!(created["id"], "chosen-by-client");
    assert_eq!(created["price"], 2750.0);
    assert_eq!(created["discountPercent"], 90.0);
    assert_eq!(created["isNew"], true);
    assert_eq!(created["category"], "General");
    assert_eq!(created["image"], "");

    let products: Vec<Value> = app
        .client
        .get(app.url("/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products.len(), 11);
    assert_eq!(products[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_create_defaults() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let created: Value = app
        .client
        .post(app.url("/products"))
        .bearer_auth(&admin)
        .json(&json!({ "price": -40, "discountPercent": -5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(created["name"], "Unnamed Product");
    assert_eq!(created["price"], 0.0);
    assert_eq!(created["discountPercent"], 0.0);
    assert_eq!(created["isNew"], false);
}

#[tokio::test]
async fn test_update_merges_fields() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let resp = app
        .client
        .put(app.url("/products/elysium-3"))
        .bearer_auth(&admin)
        .json(&json!({ "id": "renamed", "discountPercent": 25, "isNew": false }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["id"], "elysium-3");
    assert_eq!(updated["name"], "ELYSIUM");
    assert_eq!(updated["discountPercent"], 25.0);
    assert_eq!(updated["isNew"], false);

    let resp = app
        .client
        .put(app.url("/products/missing"))
        .bearer_auth(&admin)
        .json(&json!({ "name": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_returns_removed_product() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let resp = app
        .client
        .delete(app.url("/products/braven-1-1"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let removed: Value = resp.json().await.unwrap();
    assert_eq!(removed["name"], "BRAVEN");

    let again = app
        .client
        .delete(app.url("/products/braven-1-1"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
