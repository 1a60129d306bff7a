//! Process a client-relayed Razorpay success confirmation.
//!
//! Trust boundary: unlike the Stripe webhook path, the amount and cart here
//! are buyer-submitted. The Razorpay flow only signs the (order, payment)
//! pair, which the storefront verifies via `/checkout/razorpay/verify`
//! before posting this confirmation; there is no server-verified amount
//! without an extra Orders API lookup. This mirrors the upstream flow and is
//! a documented limitation, not an oversight.

use std::sync::Arc;

use crate::domain::checkout::{to_minor_units, CartItem};
use crate::domain::foundation::UserId;
use crate::domain::fulfillment::{
    FinalizeOutcome, FulfillmentError, Order, OrderFinalizer, PaymentConfirmation, PaymentProvider,
};
use crate::ports::OrderRepository;

/// Command carrying the storefront's success callback.
#[derive(Debug, Clone)]
pub struct ProcessRazorpaySuccessCommand {
    pub order_id: String,
    pub payment_id: String,
    pub user_id: String,
    pub email: String,
    pub cart_items: Vec<CartItem>,
    /// Paid amount in decimal currency units.
    pub amount: f64,
}

/// Handler for [`ProcessRazorpaySuccessCommand`].
pub struct ProcessRazorpaySuccessHandler {
    finalizer: Arc<OrderFinalizer>,
    orders: Arc<dyn OrderRepository>,
}

impl ProcessRazorpaySuccessHandler {
    pub fn new(finalizer: Arc<OrderFinalizer>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { finalizer, orders }
    }

    /// Finalizes the order, or returns the existing one for a duplicate
    /// submission.
    pub async fn handle(
        &self,
        cmd: ProcessRazorpaySuccessCommand,
    ) -> Result<Order, FulfillmentError> {
        if cmd.order_id.is_empty() || cmd.payment_id.is_empty() {
            return Err(FulfillmentError::InvalidRequest(
                "Missing payment references".to_string(),
            ));
        }
        if cmd.email.is_empty() || cmd.cart_items.is_empty() {
            return Err(FulfillmentError::InvalidRequest(
                "Missing required fields".to_string(),
            ));
        }
        let user_id = UserId::new(cmd.user_id.as_str()).map_err(|_| {
            FulfillmentError::InvalidRequest("Missing required fields".to_string())
        })?;

        let confirmation = PaymentConfirmation {
            provider: PaymentProvider::Razorpay,
            provider_order_ref: cmd.order_id.clone(),
            provider_payment_ref: cmd.payment_id,
            amount_minor: to_minor_units(cmd.amount),
            currency: "INR".to_string(),
            buyer_email: Some(cmd.email),
            user_id,
            cart: cmd.cart_items,
        };

        match self.finalizer.finalize(confirmation).await? {
            FinalizeOutcome::Completed(order) => Ok(order),
            FinalizeOutcome::AlreadyProcessed => self
                .orders
                .find_by_provider_ref(PaymentProvider::Razorpay, &cmd.order_id)
                .await?
                .ok_or_else(|| {
                    FulfillmentError::Store("duplicate confirmation without stored order".to_string())
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::adapters::memory::{InMemoryKeyPool, InMemoryOrderRepository};
    use crate::domain::foundation::ProductId;
    use crate::domain::fulfillment::DeliveryStatus;
    use crate::ports::{NotificationError, NotificationSender, ReceiptRenderer};

    struct NullRenderer;
    impl ReceiptRenderer for NullRenderer {
        fn render(&self, _order: &Order) -> String {
            String::new()
        }
    }

    struct NullNotifier;
    #[async_trait]
    impl NotificationSender for NullNotifier {
        async fn send(&self, _: &str, _: &str, _: &str) -> Result<(), NotificationError> {
            Ok(())
        }
    }

    fn cart() -> Vec<CartItem> {
        vec![CartItem {
            product_id: ProductId::new("p1").unwrap(),
            title: "Game".to_string(),
            unit_price: 499.0,
            quantity: 1,
            region: None,
            image: None,
        }]
    }

    fn command(order_id: &str) -> ProcessRazorpaySuccessCommand {
        ProcessRazorpaySuccessCommand {
            order_id: order_id.to_string(),
            payment_id: format!("pay_{}", order_id),
            user_id: "user-1".to_string(),
            email: "buyer@example.com".to_string(),
            cart_items: cart(),
            amount: 499.0,
        }
    }

    async fn handler() -> (ProcessRazorpaySuccessHandler, Arc<InMemoryOrderRepository>) {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let pool = Arc::new(InMemoryKeyPool::new());
        pool.provision(&ProductId::new("p1").unwrap(), &["KEY-1"]).await;
        let finalizer = Arc::new(OrderFinalizer::new(
            orders.clone(),
            pool,
            Arc::new(NullRenderer),
            Arc::new(NullNotifier),
        ));
        (
            ProcessRazorpaySuccessHandler::new(finalizer, orders.clone()),
            orders,
        )
    }

    #[tokio::test]
    async fn success_creates_razorpay_order_with_keys() {
        let (handler, orders) = handler().await;

        let order = handler.handle(command("order_1")).await.unwrap();

        assert!(order.order_number.starts_with("RZP-"));
        assert_eq!(order.total_amount_minor, 49900);
        assert_eq!(order.delivery_status, DeliveryStatus::Delivered);
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_submission_returns_the_original_order() {
        let (handler, orders) = handler().await;

        let first = handler.handle(command("order_dup")).await.unwrap();
        let second = handler.handle(command("order_dup")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let (handler, orders) = handler().await;

        let mut missing_email = command("order_1");
        missing_email.email = String::new();
        assert!(matches!(
            handler.handle(missing_email).await,
            Err(FulfillmentError::InvalidRequest(_))
        ));

        let mut missing_cart = command("order_2");
        missing_cart.cart_items = Vec::new();
        assert!(matches!(
            handler.handle(missing_cart).await,
            Err(FulfillmentError::InvalidRequest(_))
        ));

        let mut missing_user = command("order_3");
        missing_user.user_id = String::new();
        assert!(matches!(
            handler.handle(missing_user).await,
            Err(FulfillmentError::InvalidRequest(_))
        ));

        assert!(orders.is_empty());
    }
}
