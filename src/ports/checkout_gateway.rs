//! Checkout gateway ports - provider-hosted payment session creation.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::checkout::CartItem;
use crate::domain::foundation::UserId;

/// Errors from payment-provider session creation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure or timeout reaching the provider.
    #[error("Provider unreachable: {0}")]
    Network(String),

    /// The provider rejected the request.
    #[error("Provider rejected request: {0}")]
    Provider(String),

    /// The provider response could not be parsed.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Handle for a Stripe hosted-checkout session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// URL the client is redirected to.
    pub redirect_url: String,
    /// Provider session id (`cs_…`).
    pub provider_session_id: String,
}

/// Handle for a Razorpay order awaiting client-side checkout.
#[derive(Debug, Clone)]
pub struct ProviderOrderHandle {
    /// Razorpay order id (`order_…`).
    pub order_id: String,
    /// Order amount in minor units, echoed by the provider.
    pub amount_minor: i64,
    pub currency: String,
    /// Public key id the frontend widget needs.
    pub key_id: String,
}

/// Port for creating Stripe checkout sessions.
///
/// Implementations must embed the cart snapshot, user id, and email in the
/// session metadata so the webhook confirmation can reconstruct the purchase
/// without trusting a fresh client submission.
#[async_trait]
pub trait StripeCheckout: Send + Sync {
    async fn create_session(
        &self,
        cart: &[CartItem],
        buyer_email: &str,
        user_id: &UserId,
    ) -> Result<SessionHandle, GatewayError>;
}

/// Port for creating Razorpay orders.
#[async_trait]
pub trait RazorpayCheckout: Send + Sync {
    async fn create_order(
        &self,
        cart: &[CartItem],
        buyer_email: &str,
        user_id: &UserId,
        total_minor: i64,
    ) -> Result<ProviderOrderHandle, GatewayError>;
}
