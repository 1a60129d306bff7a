//! Axum router for checkout endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    create_razorpay_order, create_session, verify_razorpay_payment, CheckoutAppState,
};

/// Router mounted at `/checkout`.
///
/// # Routes
/// - `POST /session` - create a Stripe hosted-checkout session
/// - `POST /razorpay/create` - create a Razorpay order
/// - `POST /razorpay/verify` - verify a client-relayed payment signature
pub fn checkout_routes() -> Router<CheckoutAppState> {
    Router::new()
        .route("/session", post(create_session))
        .route("/razorpay/create", post(create_razorpay_order))
        .route("/razorpay/verify", post(verify_razorpay_payment))
}
