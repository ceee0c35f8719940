//! Integration tests for Arluxe.
//!
//! Each test spawns the storefront on an ephemeral port with seeded
//! in-memory stores and drives it over HTTP with `reqwest`.
//!
//! # Test Categories
//!
//! - `storefront_auth` - Login, registration, magic links, bearer gates
//! - `storefront_catalog` - Product listing and admin maintenance
//! - `storefront_orders` - Checkout and the order status workflow
//! - `storefront_notifications` - Seller e-mails against a mock Resend API

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arluxe_storefront::config::StorefrontConfig;
use arluxe_storefront::routes;
use arluxe_storefront::state::AppState;
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Seeded admin credentials.
pub const ADMIN_EMAIL: &str = "abdurrafayfarhan3@gmail.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Seeded customer credentials.
pub const CUSTOMER_EMAIL: &str = "user@arluxe.com";
pub const CUSTOMER_PASSWORD: &str = "user123";

/// A storefront running on a local ephemeral port.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
}

impl TestApp {
    /// Spawn the storefront with default configuration.
    pub async fn spawn() -> Self {
        Self::spawn_with(StorefrontConfig::default()).await
    }

    /// Spawn the storefront with the given configuration.
    pub async fn spawn_with(config: StorefrontConfig) -> Self {
        let state = AppState::from_config(config).expect("Failed to build application state");
        let addr = serve(routes::app(state.clone())).await;

        Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            state,
        }
    }

    /// Absolute URL of an API path such as `/products`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to send login request");

        assert_eq!(resp.status(), StatusCode::OK, "login failed for {email}");
        let body: Value = resp.json().await.expect("Failed to parse login response");
        body["token"]
            .as_str()
            .expect("login response has no token")
            .to_owned()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn customer_token(&self) -> String {
        self.login(CUSTOMER_EMAIL, CUSTOMER_PASSWORD).await
    }

    /// Place an order and return the created order body.
    pub async fn place_order(&self, token: &str, items: Value) -> Value {
        let resp = self
            .client
            .post(self.url("/orders"))
            .bearer_auth(token)
            .json(&json!({ "items": items, "shippingAddress": shipping_address() }))
            .send()
            .await
            .expect("Failed to send checkout request");

        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.expect("Failed to parse order")
    }

    /// Poll the admin order list until the order's dispatch record settles.
    pub async fn settled_dispatch(&self, admin_token: &str, order_id: &str) -> Value {
        for _ in 0..200 {
            let orders: Value = self
                .client
                .get(self.url("/orders"))
                .bearer_auth(admin_token)
                .send()
                .await
                .expect("Failed to list orders")
                .json()
                .await
                .expect("Failed to parse orders");

            let dispatch = orders
                .as_array()
                .and_then(|orders| orders.iter().find(|o| o["id"] == order_id))
                .map(|order| order["emailDispatch"].clone())
                .expect("order not listed");

            if dispatch["status"] != "pending" {
                return dispatch;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("email dispatch for {order_id} never settled");
    }
}

/// A complete shipping address payload.
#[must_use]
pub fn shipping_address() -> Value {
    json!({
        "fullName": "Ayesha Khan",
        "phone": "+92 300 1234567",
        "addressLine": "12 Zamzama Boulevard",
        "city": "Karachi",
        "state": "Sindh",
        "zipCode": "75600",
        "country": "Pakistan"
    })
}

/// A stand-in for the Resend e-mail API that records every request.
pub struct MockResend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
}

impl MockResend {
    /// Start a mock that answers `POST /emails` with `status`.
    pub async fn start(status: StatusCode) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/emails", post(accept_email))
            .with_state(MockState {
                requests: requests.clone(),
                status,
            });
        let addr = serve(app).await;

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Bodies received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().clone()
    }
}

async fn accept_email(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().push(body);
    if state.status.is_success() {
        (state.status, Json(json!({ "id": "email_test_123" })))
    } else {
        (state.status, Json(json!({ "message": "provider unavailable" })))
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    addr
}
