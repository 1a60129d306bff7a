//! Order finalizer - the confirmation -> allocation -> delivery workflow.
//!
//! ## State machine
//!
//! `received -> validated -> order_created -> keys_allocated -> notified -> done`
//!
//! Validation (signature verification, payload normalization) happens before
//! a confirmation reaches this type; a failure there rejects the request.
//! Once the order row exists, nothing fails the workflow anymore: inventory
//! shortfalls degrade the order to partial delivery, and store or email
//! faults are logged and absorbed. The provider therefore never receives a
//! 5xx that would trigger a redelivery after an order was created;
//! redeliveries that do happen are absorbed by the idempotency check.
//!
//! ## Race handling
//!
//! Duplicate confirmations for the same payment race on
//! `OrderRepository::insert` - first to insert wins, the rest observe
//! `AlreadyExists` and finish without side effects. Confirmations for
//! different orders contending for the same product are kept disjoint by the
//! allocator's per-product exclusion.

use std::sync::Arc;

use crate::domain::fulfillment::{AllocationResult, AssignedKey, Order, PaymentConfirmation};
use crate::ports::{
    InsertOutcome, KeyPoolAllocator, NotificationSender, OrderRepository, ReceiptRenderer,
};

use super::errors::FulfillmentError;

/// Result of finalizing a confirmation.
#[derive(Debug)]
pub enum FinalizeOutcome {
    /// A new order was created and fulfilled (possibly partially).
    Completed(Order),
    /// The confirmation was a duplicate; no side effects.
    AlreadyProcessed,
}

/// Orchestrates order creation, key allocation, and buyer notification for
/// verified payment confirmations.
pub struct OrderFinalizer {
    orders: Arc<dyn OrderRepository>,
    key_pool: Arc<dyn KeyPoolAllocator>,
    renderer: Arc<dyn ReceiptRenderer>,
    notifier: Arc<dyn NotificationSender>,
}

impl OrderFinalizer {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        key_pool: Arc<dyn KeyPoolAllocator>,
        renderer: Arc<dyn ReceiptRenderer>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            orders,
            key_pool,
            renderer,
            notifier,
        }
    }

    /// Processes a verified confirmation exactly once.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for an empty cart snapshot; `Store` when the order
    /// could not be created (safe to retry - no partial state exists at that
    /// point). Failures after order creation are absorbed.
    pub async fn finalize(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<FinalizeOutcome, FulfillmentError> {
        if confirmation.cart.is_empty() {
            return Err(FulfillmentError::InvalidRequest(
                "cart snapshot is empty".to_string(),
            ));
        }

        // Fast path for redelivered confirmations.
        if self
            .orders
            .find_by_provider_ref(confirmation.provider, &confirmation.provider_order_ref)
            .await?
            .is_some()
        {
            tracing::info!(
                provider = %confirmation.provider,
                provider_order_ref = %confirmation.provider_order_ref,
                "duplicate confirmation, order already exists"
            );
            return Ok(FinalizeOutcome::AlreadyProcessed);
        }

        let mut order = Order::from_confirmation(&confirmation);
        match self.orders.insert(&order).await? {
            InsertOutcome::Inserted => {}
            // Lost the race against a concurrent duplicate.
            InsertOutcome::AlreadyExists => return Ok(FinalizeOutcome::AlreadyProcessed),
        }

        tracing::info!(
            order_number = %order.order_number,
            items = order.cart.len(),
            "order created"
        );

        let (assigned, fully_granted) = self.allocate_keys(&order).await;
        order.record_allocation(assigned, fully_granted);

        // Keys are already linked to the order in the pool; a failed status
        // write is recoverable out-of-band and must not trigger a provider
        // retry that could duplicate the order.
        if let Err(e) = self.orders.update_delivery(&order).await {
            tracing::error!(
                order_number = %order.order_number,
                error = %e,
                "failed to persist delivery status"
            );
        }

        self.notify_buyer(&order).await;

        Ok(FinalizeOutcome::Completed(order))
    }

    /// Allocates keys for every cart line, accumulating grants and recording
    /// shortfalls. Allocation faults count as full shortfall for that line.
    async fn allocate_keys(&self, order: &Order) -> (Vec<AssignedKey>, bool) {
        let mut assigned = Vec::new();
        let mut fully_granted = true;

        for item in &order.cart {
            let result = match self
                .key_pool
                .allocate(&item.product_id, item.quantity, &order.id)
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(
                        product_id = %item.product_id,
                        error = %e,
                        "key allocation failed"
                    );
                    AllocationResult::none(item.quantity)
                }
            };

            if !result.is_complete() {
                tracing::warn!(
                    product_id = %item.product_id,
                    requested = item.quantity,
                    granted = result.granted.len(),
                    shortfall = result.shortfall,
                    "not enough keys for product"
                );
                fully_granted = false;
            }

            assigned.extend(result.granted.into_iter().map(|key| AssignedKey {
                product_id: key.product_id,
                code: key.code,
            }));
        }

        (assigned, fully_granted)
    }

    /// Sends the receipt email when keys were assigned and an address is
    /// known. Send failures are logged, never propagated.
    async fn notify_buyer(&self, order: &Order) {
        if order.assigned_keys.is_empty() {
            tracing::warn!(order_number = %order.order_number, "no keys assigned, email skipped");
            return;
        }
        let Some(email) = order.buyer_email.as_deref() else {
            tracing::warn!(order_number = %order.order_number, "no delivery email, email skipped");
            return;
        };

        let subject = format!("Your Game Keys - Order #{}", order.order_number);
        let html = self.renderer.render(order);
        match self.notifier.send(email, &subject, &html).await {
            Ok(()) => tracing::info!(order_number = %order.order_number, "keys emailed"),
            Err(e) => tracing::warn!(
                order_number = %order.order_number,
                error = %e,
                "receipt email failed; order state unchanged"
            ),
        }
    }
}
