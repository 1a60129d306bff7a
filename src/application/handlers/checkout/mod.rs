//! Checkout handlers - provider session creation and Razorpay payment
//! verification.

mod create_razorpay_order;
mod create_stripe_session;
mod verify_razorpay_payment;

pub use create_razorpay_order::{CreateRazorpayOrderCommand, CreateRazorpayOrderHandler};
pub use create_stripe_session::{CreateStripeSessionCommand, CreateStripeSessionHandler};
pub use verify_razorpay_payment::{VerifyRazorpayPaymentCommand, VerifyRazorpayPaymentHandler};

use crate::domain::checkout::CartItem;
use crate::domain::foundation::UserId;
use crate::domain::fulfillment::FulfillmentError;

/// Shared request validation: no guest checkout, no empty carts, and every
/// line item must be well-formed.
pub(crate) fn validate_checkout_request(
    user_id: &str,
    email: &str,
    cart: &[CartItem],
) -> Result<UserId, FulfillmentError> {
    let user_id = UserId::new(user_id)
        .map_err(|_| FulfillmentError::InvalidRequest("Login required to checkout".to_string()))?;
    if cart.is_empty() {
        return Err(FulfillmentError::InvalidRequest("Cart is empty".to_string()));
    }
    if email.trim().is_empty() {
        return Err(FulfillmentError::InvalidRequest("Email is required".to_string()));
    }
    for item in cart {
        item.validate()
            .map_err(|e| FulfillmentError::InvalidRequest(e.to_string()))?;
    }
    Ok(user_id)
}
