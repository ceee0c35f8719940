//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error body is `{"message": "..."}`.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::catalog::CatalogError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout or order operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No valid bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not an admin.
    #[error("Forbidden")]
    Forbidden,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Repository(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::InvalidOrExpiredLink
                | AuthError::LinkExpired => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::InvalidLinkBase(_)
                | AuthError::Repository(_)
                | AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Catalog(err) => match err {
                CatalogError::ProductNotFound => StatusCode::NOT_FOUND,
                CatalogError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(err) => match err {
                CheckoutError::MissingShippingAddress
                | CheckoutError::EmptyCart
                | CheckoutError::UnknownProduct(_)
                | CheckoutError::InvalidQuantity { .. }
                | CheckoutError::TotalOverflow
                | CheckoutError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
                CheckoutError::OrderNotFound => StatusCode::NOT_FOUND,
                CheckoutError::InvalidTransition { .. } => StatusCode::CONFLICT,
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the client.
    ///
    /// Internal error details are never exposed.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.status().is_server_error() {
            return "Internal server error".to_string();
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Valid email is required".to_string(),
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserNotFound => "User not found".to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidOrExpiredLink => "Invalid or expired magic link".to_string(),
                AuthError::LinkExpired => "Magic link expired".to_string(),
                _ => "Authentication error".to_string(),
            },
            Self::Catalog(_) => "Product not found".to_string(),
            Self::Checkout(err) => match err {
                CheckoutError::MissingShippingAddress => {
                    "Shipping address is required before checkout".to_string()
                }
                CheckoutError::EmptyCart => "Cart is empty".to_string(),
                CheckoutError::UnknownProduct(id) => format!("Unknown product: {id}"),
                CheckoutError::InvalidQuantity { product_id, .. } => {
                    format!("Quantity for {product_id} must be at least 1")
                }
                CheckoutError::TotalOverflow => "Order total is too large".to_string(),
                CheckoutError::OrderNotFound => "Order not found".to_string(),
                CheckoutError::InvalidStatus(_) => {
                    "Status must be one of: pending, processing, completed".to_string()
                }
                CheckoutError::InvalidTransition { from, to } => {
                    format!("Cannot move order from {from} to {to}")
                }
                CheckoutError::Repository(_) => "Internal server error".to_string(),
            },
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::Forbidden => "Admin access required".to_string(),
            Self::Repository(_) | Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "message": self.client_message() }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        Self::BadRequest("Invalid JSON body".to_string())
    }
}

/// JSON body extractor whose rejections use the `{message}` error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
