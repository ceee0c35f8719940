//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/health                  - Health check
//!
//! # Auth
//! POST   /api/auth/login              - Password login
//! POST   /api/auth/register           - Password registration
//! POST   /api/auth/magic-link/request - Issue a magic link
//! POST   /api/auth/magic-link/verify  - Exchange a magic link for a session
//! GET    /api/auth/me                 - Current user (bearer)
//!
//! # Products
//! GET    /api/products                - Catalog listing
//! GET    /api/products/{id}           - Product detail
//! POST   /api/products                - Create product (admin)
//! PUT    /api/products/{id}           - Update product (admin)
//! DELETE /api/products/{id}           - Delete product (admin)
//!
//! # Orders
//! GET    /api/orders                  - Orders visible to the caller (bearer)
//! POST   /api/orders                  - Checkout (bearer)
//! PATCH  /api/orders/{id}             - Update order status (admin)
//! ```

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::Request,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/magic-link/request", post(auth::request_magic_link))
        .route("/magic-link/verify", post(auth::verify_magic_link))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", patch(orders::update_status))
}

/// Create all API routes, without state or middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
}

/// Build the complete application with middleware and state.
///
/// # Middleware Order (outermost first)
///
/// 1. Sentry layers (hub per request, HTTP context)
/// 2. `TraceLayer` (request span with `request_id` and `user_id` fields)
/// 3. Request ID (add unique ID to each request)
/// 4. CORS (answers preflight requests)
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes())
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .layer(cors_layer())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                user_id = tracing::field::Empty,
            )
        }))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::services::notify::UnconfiguredNotifier;
    use crate::state::Stores;

    fn test_app() -> Router {
        let state = AppState::new(
            StorefrontConfig::default(),
            Stores::seeded().unwrap(),
            Arc::new(UnconfiguredNotifier),
        );
        app(state)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        send_to(&test_app(), request).await
    }

    async fn send_to(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    /// Formatted log output shared with a test subscriber.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn count(&self, message: &str) -> usize {
            String::from_utf8_lossy(&self.0.lock()).matches(message).count()
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) =
            send(Request::get("/api/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_unknown_route_and_method() {
        let (status, body) = send(Request::get("/api/nope").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");

        let (status, body) =
            send(Request::delete("/api/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");
    }

    #[tokio::test]
    async fn test_orders_require_bearer() {
        let (status, body) = send(Request::get("/api/orders").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let request = Request::post("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from("{"))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn test_write_events_logged_once() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = test_app();
        let (status, body) = send_to(
            &app,
            json_request(
                "POST",
                "/api/auth/login",
                None,
                &serde_json::json!({ "email": "abdurrafayfarhan3@gmail.com", "password": "admin123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_owned();

        let (status, _) = send_to(
            &app,
            json_request(
                "PUT",
                "/api/products/reef-33",
                Some(&token),
                &serde_json::json!({ "discountPercent": 5 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let address = serde_json::json!({
            "fullName": "Ayesha Khan",
            "phone": "+92 300 1234567",
            "addressLine": "House 12, Street 4",
            "city": "Lahore",
            "state": "Punjab",
            "zipCode": "54000",
            "country": "Pakistan"
        });
        let (status, order) = send_to(
            &app,
            json_request(
                "POST",
                "/api/orders",
                Some(&token),
                &serde_json::json!({
                    "items": [{ "id": "reef-33", "quantity": 1 }],
                    "shippingAddress": address
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send_to(
            &app,
            json_request(
                "PATCH",
                &format!("/api/orders/{}", order["id"].as_str().unwrap()),
                Some(&token),
                &serde_json::json!({ "status": "processing" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(logs.count("Product updated"), 1);
        assert_eq!(logs.count("Order placed"), 1);
        assert_eq!(logs.count("Order status updated"), 1);
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let response = test_app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}
