//! Create a Razorpay order for client-side checkout.

use std::sync::Arc;

use crate::domain::checkout::{to_minor_units, CartItem};
use crate::domain::fulfillment::FulfillmentError;
use crate::ports::{ProviderOrderHandle, RazorpayCheckout};

use super::validate_checkout_request;

/// Command to create a Razorpay order.
#[derive(Debug, Clone)]
pub struct CreateRazorpayOrderCommand {
    pub cart: Vec<CartItem>,
    pub email: String,
    pub user_id: String,
    /// Cart total in decimal currency units, as computed by the storefront.
    pub total: f64,
}

/// Handler for [`CreateRazorpayOrderCommand`].
pub struct CreateRazorpayOrderHandler {
    gateway: Arc<dyn RazorpayCheckout>,
}

impl CreateRazorpayOrderHandler {
    pub fn new(gateway: Arc<dyn RazorpayCheckout>) -> Self {
        Self { gateway }
    }

    pub async fn handle(
        &self,
        cmd: CreateRazorpayOrderCommand,
    ) -> Result<ProviderOrderHandle, FulfillmentError> {
        let user_id = validate_checkout_request(&cmd.user_id, &cmd.email, &cmd.cart)?;

        let amount_minor = to_minor_units(cmd.total);
        let order = self
            .gateway
            .create_order(&cmd.cart, &cmd.email, &user_id, amount_minor)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Razorpay order creation failed");
                FulfillmentError::Provider("Razorpay order creation failed".to_string())
            })?;

        tracing::info!(order_id = %order.order_id, "razorpay order created");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::foundation::{ProductId, UserId};
    use crate::ports::GatewayError;

    struct FakeRazorpayGateway {
        amounts: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl RazorpayCheckout for FakeRazorpayGateway {
        async fn create_order(
            &self,
            _cart: &[CartItem],
            _buyer_email: &str,
            _user_id: &UserId,
            total_minor: i64,
        ) -> Result<ProviderOrderHandle, GatewayError> {
            self.amounts.lock().unwrap().push(total_minor);
            Ok(ProviderOrderHandle {
                order_id: "order_test_1".to_string(),
                amount_minor: total_minor,
                currency: "INR".to_string(),
                key_id: "rzp_test_id".to_string(),
            })
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

    #[tokio::test]
    async fn total_is_converted_to_paise() {
        let gateway = Arc::new(FakeRazorpayGateway {
            amounts: Mutex::new(Vec::new()),
        });
        let handler = CreateRazorpayOrderHandler::new(gateway.clone());

        let order = handler
            .handle(CreateRazorpayOrderCommand {
                cart: cart(),
                email: "a@b.com".to_string(),
                user_id: "user-1".to_string(),
                total: 499.0,
            })
            .await
            .unwrap();

        assert_eq!(order.amount_minor, 49900);
        assert_eq!(*gateway.amounts.lock().unwrap(), vec![49900]);
    }

    #[tokio::test]
    async fn missing_user_is_rejected() {
        let handler = CreateRazorpayOrderHandler::new(Arc::new(FakeRazorpayGateway {
            amounts: Mutex::new(Vec::new()),
        }));

        let result = handler
            .handle(CreateRazorpayOrderCommand {
                cart: cart(),
                email: "a@b.com".to_string(),
                user_id: String::new(),
                total: 499.0,
            })
            .await;

        assert!(matches!(result, Err(FulfillmentError::InvalidRequest(_))));
    }
}
