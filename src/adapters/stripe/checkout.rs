//! Stripe Checkout Session creation.
//!
//! Uses Stripe's form-encoded REST API directly. The cart snapshot, user id,
//! and email are written into the session's order-level metadata so the
//! webhook confirmation can rebuild the purchase from the verified event
//! alone.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::checkout::CartItem;
use crate::domain::foundation::UserId;
use crate::ports::{GatewayError, SessionHandle, StripeCheckout};

/// Bounded timeout for Stripe API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (`sk_live_…` / `sk_test_…`).
    secret_key: SecretString,

    /// Storefront base URL for success/cancel redirects.
    frontend_url: String,

    /// Base URL for the Stripe API.
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(secret_key: SecretString, frontend_url: impl Into<String>) -> Self {
        Self {
            secret_key,
            frontend_url: frontend_url.into(),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe implementation of the [`StripeCheckout`] port.
pub struct StripeCheckoutGateway {
    config: StripeConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
    id: String,
    url: String,
}

impl StripeCheckoutGateway {
    pub fn new(config: StripeConfig) -> Self {
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
impl StripeCheckout for StripeCheckoutGateway {
    async fn create_session(
        &self,
        cart: &[CartItem],
        buyer_email: &str,
        user_id: &UserId,
    ) -> Result<SessionHandle, GatewayError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = session_params(cart, buyer_email, user_id, &self.config.frontend_url)?;

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.secret_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Stripe session creation failed");
            return Err(GatewayError::Provider(error_text));
        }

        let session: StripeSessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(SessionHandle {
            redirect_url: session.url,
            provider_session_id: session.id,
        })
    }
}

/// Builds the form-encoded parameters for a checkout session.
fn session_params(
    cart: &[CartItem],
    buyer_email: &str,
    user_id: &UserId,
    frontend_url: &str,
) -> Result<Vec<(String, String)>, GatewayError> {
    let mut params: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("payment_method_types[0]".into(), "card".into()),
        ("customer_email".into(), buyer_email.to_string()),
        ("billing_address_collection".into(), "required".into()),
        ("phone_number_collection[enabled]".into(), "true".into()),
        (
            "success_url".into(),
            format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", frontend_url),
        ),
        ("cancel_url".into(), format!("{}/cancel", frontend_url)),
    ];

    for (i, item) in cart.iter().enumerate() {
        let prefix = format!("line_items[{}]", i);
        params.push((
            format!("{}[price_data][currency]", prefix),
            "inr".to_string(),
        ));
        params.push((
            format!("{}[price_data][product_data][name]", prefix),
            item.title.clone(),
        ));
        params.push((
            format!("{}[price_data][product_data][metadata][productId]", prefix),
            item.product_id.to_string(),
        ));
        if let Some(image) = &item.image {
            params.push((
                format!("{}[price_data][product_data][images][0]", prefix),
                image.clone(),
            ));
        }
        params.push((
            format!("{}[price_data][unit_amount]", prefix),
            item.unit_price_minor().to_string(),
        ));
        params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
    }

    // Order-level metadata: everything the confirmation path needs.
    let cart_snapshot = serde_json::to_string(cart)
        .map_err(|e| GatewayError::InvalidResponse(format!("cart serialization: {}", e)))?;
    params.push(("metadata[userId]".into(), user_id.to_string()));
    params.push(("metadata[email]".into(), buyer_email.to_string()));
    params.push(("metadata[cart]".into(), cart_snapshot));

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ProductId;

    fn cart() -> Vec<CartItem> {
        vec![
            CartItem {
                product_id: ProductId::new("p1").unwrap(),
                title: "Starfall Tactics".to_string(),
                unit_price: 19.99,
                quantity: 2,
                region: Some("IN".to_string()),
                image: Some("https://cdn.example.com/p1.jpg".to_string()),
            },
            CartItem {
                product_id: ProductId::new("p2").unwrap(),
                title: "Nebula Drift".to_string(),
                unit_price: 5.0,
                quantity: 1,
                region: None,
                image: None,
            },
        ]
    }

    fn params() -> Vec<(String, String)> {
        session_params(
            &cart(),
            "buyer@example.com",
            &UserId::new("user-1").unwrap(),
            "https://shop.example.com",
        )
        .unwrap()
    }

    fn value_of<'a>(params: &'a [(String, String)], key: &str) -> &'a str {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing param {}", key))
    }

    #[test]
    fn amounts_are_integer_minor_units() {
        let params = params();
        assert_eq!(
            value_of(&params, "line_items[0][price_data][unit_amount]"),
            "1999"
        );
        assert_eq!(
            value_of(&params, "line_items[1][price_data][unit_amount]"),
            "500"
        );
    }

    #[test]
    fn redirect_urls_use_the_frontend_base() {
        let params = params();
        assert_eq!(
            value_of(&params, "success_url"),
            "https://shop.example.com/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(value_of(&params, "cancel_url"), "https://shop.example.com/cancel");
    }

    #[test]
    fn product_ids_ride_along_in_line_metadata() {
        let params = params();
        assert_eq!(
            value_of(&params, "line_items[0][price_data][product_data][metadata][productId]"),
            "p1"
        );
    }

    #[test]
    fn image_is_omitted_when_absent() {
        let params = params();
        assert!(params
            .iter()
            .any(|(k, _)| k == "line_items[0][price_data][product_data][images][0]"));
        assert!(!params
            .iter()
            .any(|(k, _)| k == "line_items[1][price_data][product_data][images][0]"));
    }

    #[test]
    fn metadata_cart_snapshot_roundtrips() {
        let params = params();
        let snapshot = value_of(&params, "metadata[cart]");

        let parsed: Vec<CartItem> = serde_json::from_str(snapshot).unwrap();

        assert_eq!(parsed, cart());
        assert_eq!(value_of(&params, "metadata[userId]"), "user-1");
        assert_eq!(value_of(&params, "metadata[email]"), "buyer@example.com");
    }
}
