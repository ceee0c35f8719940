//! Background delivery of seller notifications.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::{Notifier, NotifyError};
use crate::config::NotificationConfig;
use crate::db::OrderStore;
use crate::models::{EmailDispatch, Order, User};

/// Runs notifications off the request path and records their outcome.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    orders: Arc<dyn OrderStore>,
    max_attempts: u32,
    retry_base_delay: Duration,
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(
        notifier: Arc<dyn Notifier>,
        orders: Arc<dyn OrderStore>,
        config: &NotificationConfig,
    ) -> Self {
        Self {
            notifier,
            orders,
            max_attempts: config.max_attempts.max(1),
            retry_base_delay: config.retry_base_delay,
        }
    }

    /// Deliver in a background task.
    ///
    /// The returned handle resolves to the recorded outcome; callers that do
    /// not care may drop it.
    pub fn dispatch(&self, order: Order, buyer: User) -> JoinHandle<EmailDispatch> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.deliver(&order, &buyer).await })
    }

    /// Deliver with retries and write the outcome to the order.
    pub async fn deliver(&self, order: &Order, buyer: &User) -> EmailDispatch {
        let outcome = self.attempt(order, buyer).await;

        if let Err(e) = self
            .orders
            .set_email_dispatch(&order.id, outcome.clone())
            .await
        {
            tracing::warn!(order_id = %order.id, error = %e, "Could not record email dispatch");
        }

        outcome
    }

    async fn attempt(&self, order: &Order, buyer: &User) -> EmailDispatch {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.notifier.send(order, buyer).await {
                Ok(receipt) => {
                    tracing::info!(
                        order_id = %order.id,
                        provider = %receipt.provider,
                        attempts,
                        "Seller notified"
                    );
                    return EmailDispatch::Sent {
                        provider: receipt.provider,
                        id: receipt.id,
                        attempts,
                    };
                }
                Err(e) if e.is_retryable() && attempts < self.max_attempts => {
                    let delay = backoff_delay(self.retry_base_delay, attempts);
                    tracing::warn!(
                        order_id = %order.id,
                        error = %e,
                        attempts,
                        retry_in_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Seller notification failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    log_failure(order, &e, attempts);
                    return EmailDispatch::Failed {
                        error: e.to_string(),
                        attempts,
                    };
                }
            }
        }
    }
}

fn log_failure(order: &Order, error: &NotifyError, attempts: u32) {
    if matches!(error, NotifyError::NotConfigured) {
        tracing::warn!(order_id = %order.id, "Seller notification skipped: {error}");
    } else {
        tracing::error!(order_id = %order.id, error = %error, attempts, "Seller notification failed");
    }
}

/// Delay before retry number `attempt`: `base * 2^(attempt - 1)`.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(factor)
}
