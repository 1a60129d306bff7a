//! Razorpay Orders API client.
//!
//! Creates a provider-side order the frontend widget completes. The cart
//! snapshot, user id, and email travel in the order notes; the public key id
//! is returned to the client for the checkout widget.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::domain::checkout::CartItem;
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{GatewayError, ProviderOrderHandle, RazorpayCheckout};

/// Bounded timeout for Razorpay API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key id (`rzp_…`), shared with the frontend widget.
    key_id: String,

    /// Key secret for API auth.
    key_secret: SecretString,

    /// Base URL for the Razorpay API.
    api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret,
            api_base_url: "https://api.razorpay.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Razorpay implementation of the [`RazorpayCheckout`] port.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
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
impl RazorpayCheckout for RazorpayGateway {
    async fn create_order(
        &self,
        cart: &[CartItem],
        buyer_email: &str,
        user_id: &UserId,
        total_minor: i64,
    ) -> Result<ProviderOrderHandle, GatewayError> {
        let url = format!("{}/v1/orders", self.config.api_base_url);
        let body = order_body(cart, buyer_email, user_id, total_minor)?;

        let response = self
            .http_client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Razorpay order creation failed");
            return Err(GatewayError::Provider(error_text));
        }

        let order: RazorpayOrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(ProviderOrderHandle {
            order_id: order.id,
            amount_minor: order.amount,
            currency: order.currency,
            key_id: self.config.key_id.clone(),
        })
    }
}

/// Builds the Orders API request body.
fn order_body(
    cart: &[CartItem],
    buyer_email: &str,
    user_id: &UserId,
    total_minor: i64,
) -> Result<serde_json::Value, GatewayError> {
    let cart_snapshot = serde_json::to_string(cart)
        .map_err(|e| GatewayError::InvalidResponse(format!("cart serialization: {}", e)))?;

    Ok(json!({
        "amount": total_minor,
        "currency": "INR",
        "receipt": format!("order_rcpt_{}", Timestamp::now().as_unix_millis()),
        "notes": {
            "userId": user_id.to_string(),
            "email": buyer_email,
            "cart": cart_snapshot,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ProductId;

    fn cart() -> Vec<CartItem> {
        vec![CartItem {
            product_id: ProductId::new("p1").unwrap(),
            title: "Starfall Tactics".to_string(),
            unit_price: 499.0,
            quantity: 1,
            region: None,
            image: None,
        }]
    }

    #[test]
    fn body_carries_amount_in_paise_and_inr() {
        let body = order_body(&cart(), "a@b.com", &UserId::new("u1").unwrap(), 49900).unwrap();

        assert_eq!(body["amount"], 49900);
        assert_eq!(body["currency"], "INR");
    }

    #[test]
    fn body_receipt_is_prefixed() {
        let body = order_body(&cart(), "a@b.com", &UserId::new("u1").unwrap(), 49900).unwrap();

        assert!(body["receipt"].as_str().unwrap().starts_with("order_rcpt_"));
    }

    #[test]
    fn notes_snapshot_roundtrips() {
        let body = order_body(&cart(), "a@b.com", &UserId::new("u1").unwrap(), 49900).unwrap();

        let parsed: Vec<CartItem> =
            serde_json::from_str(body["notes"]["cart"].as_str().unwrap()).unwrap();

        assert_eq!(parsed, cart());
        assert_eq!(body["notes"]["userId"], "u1");
        assert_eq!(body["notes"]["email"], "a@b.com");
    }
}
