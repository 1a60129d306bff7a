//! Stripe adapter - hosted-checkout session creation over the REST API.
//!
//! Webhook signature verification lives in the domain layer
//! (`domain::fulfillment::StripeWebhookVerifier`); this module only talks to
//! Stripe outbound.

mod checkout;

pub use checkout::{StripeCheckoutGateway, StripeConfig};
