//! Process a Stripe webhook delivery.
//!
//! The raw request body is verified against the `stripe-signature` header
//! before anything is parsed out of it; event types other than checkout
//! completion are acknowledged and skipped so Stripe stops redelivering
//! them.

use std::sync::Arc;

use crate::domain::fulfillment::{
    FinalizeOutcome, FulfillmentError, OrderFinalizer, StripeWebhookVerifier,
};

/// Command carrying the unmodified webhook request.
pub struct ProcessStripeWebhookCommand {
    /// Raw body bytes, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the `stripe-signature` header.
    pub signature_header: String,
}

/// How the webhook was handled; every variant is acknowledged with a 2xx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A new order was created and fulfilled.
    Processed,
    /// Duplicate delivery of an already-processed confirmation.
    AlreadyProcessed,
    /// Recognized event type we do not act on.
    Ignored,
}

/// Handler for [`ProcessStripeWebhookCommand`].
pub struct ProcessStripeWebhookHandler {
    verifier: Arc<StripeWebhookVerifier>,
    finalizer: Arc<OrderFinalizer>,
}

impl ProcessStripeWebhookHandler {
    pub fn new(verifier: Arc<StripeWebhookVerifier>, finalizer: Arc<OrderFinalizer>) -> Self {
        Self { verifier, finalizer }
    }

    pub async fn handle(
        &self,
        cmd: ProcessStripeWebhookCommand,
    ) -> Result<WebhookOutcome, FulfillmentError> {
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &cmd.signature_header)
            .map_err(|e| {
                tracing::warn!(error = %e, "stripe webhook rejected");
                e
            })?;

        let event_id = event.id.clone();
        let confirmation = match event.into_confirmation() {
            Ok(confirmation) => confirmation,
            Err(FulfillmentError::Ignored(event_type)) => {
                tracing::info!(event_id = %event_id, event_type = %event_type, "ignored stripe event");
                return Ok(WebhookOutcome::Ignored);
            }
            Err(e) => return Err(e),
        };

        match self.finalizer.finalize(confirmation).await? {
            FinalizeOutcome::Completed(order) => {
                tracing::info!(
                    event_id = %event_id,
                    order_number = %order.order_number,
                    "checkout completed"
                );
                Ok(WebhookOutcome::Processed)
            }
            FinalizeOutcome::AlreadyProcessed => Ok(WebhookOutcome::AlreadyProcessed),
        }
    }
}
