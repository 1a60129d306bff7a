//! Axum router for order endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_order, list_orders, razorpay_success, stripe_webhook, OrdersAppState};

/// Router mounted at `/orders`.
///
/// # Routes
///
/// ## Payment callbacks (public; verified by signature or upstream flow)
/// - `POST /stripe/webhook` - Stripe confirmation, raw body required
/// - `POST /razorpay/success` - client-relayed Razorpay confirmation
///
/// ## Reads (authenticated)
/// - `GET /` - the caller's orders
/// - `GET /:id` - one order
pub fn order_routes() -> Router<OrdersAppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/:id", get(get_order))
        .route("/stripe/webhook", post(stripe_webhook))
        .route("/razorpay/success", post(razorpay_success))
}
