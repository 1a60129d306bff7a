//! HTTP handlers for checkout endpoints.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::adapters::http::ApiError;
use crate::application::handlers::checkout::{
    CreateRazorpayOrderCommand, CreateRazorpayOrderHandler, CreateStripeSessionCommand,
    CreateStripeSessionHandler, VerifyRazorpayPaymentCommand, VerifyRazorpayPaymentHandler,
};
use crate::domain::fulfillment::RazorpaySignatureVerifier;
use crate::ports::{RazorpayCheckout, StripeCheckout};

use super::dto::{
    CreateRazorpayOrderRequest, CreateSessionRequest, RazorpayOrderResponse, SessionResponse,
    VerifyPaymentRequest, VerifyPaymentResponse,
};

/// Shared state for the checkout router.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub stripe_gateway: Arc<dyn StripeCheckout>,
    pub razorpay_gateway: Arc<dyn RazorpayCheckout>,
    pub razorpay_verifier: Arc<RazorpaySignatureVerifier>,
}

impl CheckoutAppState {
    fn stripe_session_handler(&self) -> CreateStripeSessionHandler {
        CreateStripeSessionHandler::new(self.stripe_gateway.clone())
    }

    fn razorpay_order_handler(&self) -> CreateRazorpayOrderHandler {
        CreateRazorpayOrderHandler::new(self.razorpay_gateway.clone())
    }

    fn verify_payment_handler(&self) -> VerifyRazorpayPaymentHandler {
        VerifyRazorpayPaymentHandler::new(self.razorpay_verifier.clone())
    }
}

/// POST /checkout/session - create a Stripe hosted-checkout session.
pub async fn create_session(
    State(state): State<CheckoutAppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .stripe_session_handler()
        .handle(CreateStripeSessionCommand {
            cart: request.cart_items,
            email: request.email,
            user_id: request.user_id,
        })
        .await?;

    Ok(Json(SessionResponse {
        url: session.redirect_url,
        id: session.provider_session_id,
    }))
}

/// POST /checkout/razorpay/create - create a Razorpay order.
pub async fn create_razorpay_order(
    State(state): State<CheckoutAppState>,
    Json(request): Json<CreateRazorpayOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .razorpay_order_handler()
        .handle(CreateRazorpayOrderCommand {
            cart: request.cart_items,
            email: request.email,
            user_id: request.user_id,
            total: request.total,
        })
        .await?;

    Ok(Json(RazorpayOrderResponse {
        success: true,
        order_id: order.order_id,
        amount: order.amount_minor,
        currency: order.currency,
        key: order.key_id,
    }))
}

/// POST /checkout/razorpay/verify - verify a client-relayed payment
/// signature.
pub async fn verify_razorpay_payment(
    State(state): State<CheckoutAppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .verify_payment_handler()
        .handle(VerifyRazorpayPaymentCommand {
            razorpay_order_id: request.razorpay_order_id,
            razorpay_payment_id: request.razorpay_payment_id,
            razorpay_signature: request.razorpay_signature,
        })?;

    Ok(Json(VerifyPaymentResponse { verified: true }))
}
