//! Resend API client for seller notifications.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{Notifier, NotifyError, OrderEmail, Receipt};
use crate::config::NotificationConfig;
use crate::models::{Order, User};

const PROVIDER: &str = "resend";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

/// Sends order notifications through the Resend HTTP API.
#[derive(Clone)]
pub struct ResendNotifier {
    client: reqwest::Client,
    endpoint: String,
    from: String,
    to: String,
}

impl ResendNotifier {
    /// Create a new Resend client.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Configuration` if the API key is not a valid
    /// header value or the HTTP client fails to build.
    pub fn new(config: &NotificationConfig, api_key: &SecretString) -> Result<Self, NotifyError> {
        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| NotifyError::Configuration(format!("Invalid API key format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", config.resend_api_url.trim_end_matches('/')),
            from: config.sender_email.clone(),
            to: config.seller_email.clone(),
        })
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send(&self, order: &Order, buyer: &User) -> Result<Receipt, NotifyError> {
        let email = OrderEmail::render(order, buyer)?;

        let body = SendEmailRequest {
            from: &self.from,
            to: [&self.to],
            subject: &email.subject,
            text: &email.text,
            html: &email.html,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        // The message was accepted; a body we cannot read only loses the id.
        let id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|r| r.id);

        Ok(Receipt {
            provider: PROVIDER.to_owned(),
            id,
        })
    }
}
