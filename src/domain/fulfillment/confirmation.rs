//! Normalized payment confirmations.
//!
//! Provider-specific payloads (Stripe webhook events, Razorpay success
//! submissions) are normalized into [`PaymentConfirmation`] before entering
//! the order finalizer, which is therefore provider-agnostic.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::checkout::CartItem;
use crate::domain::foundation::UserId;

/// The payment provider a confirmation originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Stripe,
    Razorpay,
}

impl PaymentProvider {
    /// Stable string form used in persistence and order numbers.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Stripe => "stripe",
            PaymentProvider::Razorpay => "razorpay",
        }
    }

    /// Parses the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stripe" => Some(PaymentProvider::Stripe),
            "razorpay" => Some(PaymentProvider::Razorpay),
            _ => None,
        }
    }

    /// Prefix for human-readable order numbers.
    pub fn order_number_prefix(&self) -> &'static str {
        match self {
            PaymentProvider::Stripe => "ORD",
            PaymentProvider::Razorpay => "RZP",
        }
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified assertion that a specific payment succeeded.
///
/// Produced once per successful payment by a provider adapter after
/// signature verification. The `(provider, provider_order_ref)` pair is the
/// idempotency key: duplicate confirmations carrying the same pair must not
/// create a second order.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfirmation {
    pub provider: PaymentProvider,

    /// Provider-side order/session reference (Stripe session id, Razorpay
    /// order id).
    pub provider_order_ref: String,

    /// Provider-side payment reference (payment intent / payment id).
    pub provider_payment_ref: String,

    /// Paid amount in integer minor currency units.
    pub amount_minor: i64,

    /// ISO currency code, uppercase.
    pub currency: String,

    /// Delivery email, when the provider supplied one.
    pub buyer_email: Option<String>,

    pub user_id: UserId,

    /// Cart snapshot taken at checkout time.
    pub cart: Vec<CartItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_string_roundtrip() {
        for provider in [PaymentProvider::Stripe, PaymentProvider::Razorpay] {
            assert_eq!(PaymentProvider::parse(provider.as_str()), Some(provider));
        }
    }

    #[test]
    fn unknown_provider_string_is_rejected() {
        assert_eq!(PaymentProvider::parse("paypal"), None);
    }

    #[test]
    fn order_number_prefixes_differ_per_provider() {
        assert_eq!(PaymentProvider::Stripe.order_number_prefix(), "ORD");
        assert_eq!(PaymentProvider::Razorpay.order_number_prefix(), "RZP");
    }
}
