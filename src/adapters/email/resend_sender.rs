//! Resend implementation of the NotificationSender port.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::ports::{NotificationError, NotificationSender};

/// Bounded timeout for email dispatch; a slow email service must not stall
/// the confirmation handler.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,

    /// `From` header value, e.g. `Pixelkeys <orders@pixelkeys.shop>`.
    from: String,

    /// Base URL for the Resend API.
    api_base_url: String,
}

impl ResendConfig {
    pub fn new(api_key: SecretString, from: impl Into<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            api_base_url: "https://api.resend.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Sends notification emails through Resend's REST API.
pub struct ResendSender {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendSender {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client construction cannot fail with static config"),
        }
    }
}

#[async_trait]
impl NotificationSender for ResendSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotificationError> {
        let url = format!("{}/emails", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&json!({
                "from": self.config.from,
                "to": [to],
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| NotificationError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotificationError(format!("{}: {}", status, error_text)));
        }

        Ok(())
    }
}
