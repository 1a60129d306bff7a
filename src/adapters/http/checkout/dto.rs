//! Wire DTOs for the checkout endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::checkout::CartItem;

/// Request to create a Stripe checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(rename = "cartItems", default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "userId", default)]
    pub user_id: String,
}

/// Response with the hosted-checkout redirect.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub url: String,
    pub id: String,
}

/// Request to create a Razorpay order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRazorpayOrderRequest {
    #[serde(rename = "cartItems", default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(default)]
    pub total: f64,
}

/// Response with the Razorpay order the frontend widget opens.
#[derive(Debug, Clone, Serialize)]
pub struct RazorpayOrderResponse {
    pub success: bool,
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    /// Public key id for the checkout widget.
    pub key: String,
}

/// Request to verify a client-relayed Razorpay payment signature.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
}

/// Verification result.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentResponse {
    pub verified: bool,
}
