//! Seller order notifications.
//!
//! A [`Notifier`] delivers one order summary to the seller. The
//! [`NotificationDispatcher`] runs deliveries in the background, retries
//! transient failures and records the outcome on the order.

mod dispatcher;
mod message;
mod resend;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::NotificationConfig;
use crate::models::{Order, User};

pub use dispatcher::NotificationDispatcher;
pub use message::OrderEmail;
pub use resend::ResendNotifier;

/// Errors that can occur when notifying the seller.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No e-mail provider is configured.
    #[error("Seller email is not configured. Set RESEND_API_KEY to enable order emails.")]
    NotConfigured,

    /// The provider client could not be built.
    #[error("Invalid provider configuration: {0}")]
    Configuration(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("Order email failed: {status} - {message}")]
    Provider { status: u16, message: String },

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl NotifyError {
    /// Whether another attempt might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Provider { .. })
    }
}

/// Proof of delivery returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Provider name, e.g. `resend`.
    pub provider: String,
    /// Provider message id, when returned.
    pub id: Option<String>,
}

/// Delivers order notifications to the seller.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the notification for `order` placed by `buyer`.
    async fn send(&self, order: &Order, buyer: &User) -> Result<Receipt, NotifyError>;
}

/// Notifier used when no provider is configured. Always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredNotifier;

#[async_trait]
impl Notifier for UnconfiguredNotifier {
    async fn send(&self, _order: &Order, _buyer: &User) -> Result<Receipt, NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}

/// Build the notifier selected by configuration.
///
/// # Errors
///
/// Returns `NotifyError::Configuration` if the Resend client cannot be built.
pub fn notifier_from_config(config: &NotificationConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match &config.resend_api_key {
        Some(api_key) => Ok(Arc::new(ResendNotifier::new(config, api_key)?)),
        None => {
            tracing::warn!("RESEND_API_KEY not set, seller order emails are disabled");
            Ok(Arc::new(UnconfiguredNotifier))
        }
    }
}
