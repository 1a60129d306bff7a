//! Verify a client-relayed Razorpay payment signature.

use std::sync::Arc;

use crate::domain::fulfillment::{FulfillmentError, RazorpaySignatureVerifier};

/// Command carrying the fields Razorpay hands the client after checkout.
#[derive(Debug, Clone)]
pub struct VerifyRazorpayPaymentCommand {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Handler for [`VerifyRazorpayPaymentCommand`].
pub struct VerifyRazorpayPaymentHandler {
    verifier: Arc<RazorpaySignatureVerifier>,
}

impl VerifyRazorpayPaymentHandler {
    pub fn new(verifier: Arc<RazorpaySignatureVerifier>) -> Self {
        Self { verifier }
    }

    pub fn handle(&self, cmd: VerifyRazorpayPaymentCommand) -> Result<(), FulfillmentError> {
        if cmd.razorpay_order_id.is_empty()
            || cmd.razorpay_payment_id.is_empty()
            || cmd.razorpay_signature.is_empty()
        {
            return Err(FulfillmentError::InvalidRequest(
                "Missing verification fields".to_string(),
            ));
        }

        self.verifier.verify(
            &cmd.razorpay_order_id,
            &cmd.razorpay_payment_id,
            &cmd.razorpay_signature,
        )?;

        tracing::info!(order_id = %cmd.razorpay_order_id, "razorpay payment verified");
        Ok(())
    }
}
