//! Integration tests for seller order notifications.
//!
//! A local axum server stands in for the Resend API.
//!
//! Run with: cargo test -p arluxe-integration-tests

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use arluxe_integration_tests::{CUSTOMER_EMAIL, MockResend, TestApp};
use arluxe_storefront::config::StorefrontConfig;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::json;

fn config_for(mock: &MockResend) -> StorefrontConfig {
    let mut config = StorefrontConfig::default();
    config.notifications.resend_api_key = Some(SecretString::from("re_9fK2xLq7TzB4mWc8RvN1pYs6"));
    config.notifications.resend_api_url.clone_from(&mock.base_url);
    config.notifications.seller_email = "seller@arluxe.com".to_owned();
    config.notifications.retry_base_delay = Duration::from_millis(5);
    config
}

#[tokio::test]
async fn test_order_email_sent_to_seller() {
    let mock = MockResend::start(StatusCode::OK).await;
    let app = TestApp::spawn_with(config_for(&mock)).await;
    let admin = app.admin_token().await;
    let customer = app.customer_token().await;

    let order = app
        .place_order(&customer, json!([{ "id": "reef-33", "quantity": 2 }]))
        .await;
    let order_id = order["id"].as_str().unwrap();

    let dispatch = app.settled_dispatch(&admin, order_id).await;
    assert_eq!(dispatch["status"], "sent");
    assert_eq!(dispatch["provider"], "resend");
    assert_eq!(dispatch["id"], "email_test_123");
    assert_eq!(dispatch["attempts"], 1);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let email = &requests[0];
    assert_eq!(email["to"], json!(["seller@arluxe.com"]));
    assert_eq!(email["from"], "onboarding@resend.dev");
    assert_eq!(
        email["subject"],
        format!("New Order {order_id} - {CUSTOMER_EMAIL}")
    );

    let text = email["text"].as_str().unwrap();
    assert!(text.contains("REEF 33 x2"));
    assert!(text.contains("Total: Rs 7,000"));
    assert!(text.contains("Karachi, Sindh, 75600"));
    assert!(email["html"].as_str().unwrap().contains("<table"));
}

#[tokio::test]
async fn test_provider_failure_is_retried_and_recorded() {
    let mock = MockResend::start(StatusCode::BAD_GATEWAY).await;
    let app = TestApp::spawn_with(config_for(&mock)).await;
    let admin = app.admin_token().await;
    let customer = app.customer_token().await;

    let order = app
        .place_order(&customer, json!([{ "id": "officer-1", "quantity": 1 }]))
        .await;
    assert_eq!(order["status"], "pending");

    let dispatch = app
        .settled_dispatch(&admin, order["id"].as_str().unwrap())
        .await;
    assert_eq!(dispatch["status"], "failed");
    assert_eq!(dispatch["attempts"], 3);
    assert!(
        dispatch["error"]
            .as_str()
            .unwrap()
            .contains("provider unavailable")
    );
    assert_eq!(mock.requests().len(), 3);
}

#[tokio::test]
async fn test_missing_api_key_does_not_block_checkout() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token().await;

    let order = app
        .place_order(&customer, json!([{ "id": "miranee-1", "quantity": 1 }]))
        .await;

    let dispatch = app
        .settled_dispatch(&admin, order["id"].as_str().unwrap())
        .await;
    assert_eq!(dispatch["status"], "failed");
    assert_eq!(dispatch["attempts"], 1);
    assert!(
        dispatch["error"]
            .as_str()
            .unwrap()
            .contains("RESEND_API_KEY")
    );
}
