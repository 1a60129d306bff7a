//! Stripe webhook event parsing and normalization.
//!
//! Only the fields this service consumes are captured. Amount, currency,
//! buyer email, references, and the cart snapshot are taken from the
//! signature-verified event object - never from forgeable request fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::checkout::CartItem;
use crate::domain::foundation::UserId;

use super::confirmation::{PaymentConfirmation, PaymentProvider};
use super::errors::FulfillmentError;

/// The one event type that triggers fulfillment.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Stripe webhook event (simplified).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Event id (`evt_…`).
    pub id: String,

    /// Event type, e.g. `checkout.session.completed`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp of event creation.
    pub created: i64,

    pub data: StripeEventData,

    pub livemode: bool,
}

/// Container for the event's polymorphic payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

/// The checkout session object inside a `checkout.session.completed` event.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionObject {
    /// Session id (`cs_…`) - the provider order reference.
    pub id: String,

    /// Payment intent id (`pi_…`) - the provider payment reference.
    #[serde(default)]
    pub payment_intent: Option<String>,

    /// Total paid amount in minor units.
    #[serde(default)]
    pub amount_total: Option<i64>,

    /// Lowercase ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    /// Order-level metadata written at session creation: `userId`, `email`,
    /// and the `cart` JSON snapshot.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripeEvent {
    /// True when this event should trigger fulfillment.
    pub fn is_checkout_completed(&self) -> bool {
        self.event_type == CHECKOUT_COMPLETED
    }

    /// Normalizes a `checkout.session.completed` event into a
    /// [`PaymentConfirmation`].
    ///
    /// Any other event type yields `Ignored`, which callers acknowledge with
    /// a 2xx so Stripe stops redelivering it.
    pub fn into_confirmation(self) -> Result<PaymentConfirmation, FulfillmentError> {
        if !self.is_checkout_completed() {
            return Err(FulfillmentError::Ignored(self.event_type));
        }

        let session: CheckoutSessionObject = serde_json::from_value(self.data.object)
            .map_err(|e| FulfillmentError::MalformedPayload(format!("checkout session: {}", e)))?;

        let user_id = session
            .metadata
            .get("userId")
            .ok_or(FulfillmentError::MissingMetadata("userId"))
            .and_then(|raw| {
                UserId::new(raw.as_str()).map_err(|_| FulfillmentError::MissingMetadata("userId"))
            })?;

        let cart_json = session
            .metadata
            .get("cart")
            .ok_or(FulfillmentError::MissingMetadata("cart"))?;
        let cart: Vec<CartItem> = serde_json::from_str(cart_json)
            .map_err(|e| FulfillmentError::MalformedPayload(format!("cart metadata: {}", e)))?;
        if cart.is_empty() {
            return Err(FulfillmentError::MissingMetadata("cart"));
        }

        let amount_minor = session
            .amount_total
            .ok_or(FulfillmentError::MissingField("amount_total"))?;

        let buyer_email = session
            .customer_email
            .or_else(|| session.metadata.get("email").cloned());

        Ok(PaymentConfirmation {
            provider: PaymentProvider::Stripe,
            provider_order_ref: session.id,
            provider_payment_ref: session.payment_intent.unwrap_or_default(),
            amount_minor,
            currency: session
                .currency
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| "INR".to_string()),
            buyer_email,
            user_id,
            cart,
        })
    }
}
