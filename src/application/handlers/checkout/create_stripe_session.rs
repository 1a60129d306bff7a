//! Create a Stripe hosted-checkout session from a cart.

use std::sync::Arc;

use crate::domain::checkout::CartItem;
use crate::domain::fulfillment::FulfillmentError;
use crate::ports::{SessionHandle, StripeCheckout};

use super::validate_checkout_request;

/// Command to start a Stripe checkout.
#[derive(Debug, Clone)]
pub struct CreateStripeSessionCommand {
    pub cart: Vec<CartItem>,
    pub email: String,
    pub user_id: String,
}

/// Handler for [`CreateStripeSessionCommand`].
pub struct CreateStripeSessionHandler {
    gateway: Arc<dyn StripeCheckout>,
}

impl CreateStripeSessionHandler {
    pub fn new(gateway: Arc<dyn StripeCheckout>) -> Self {
        Self { gateway }
    }

    pub async fn handle(
        &self,
        cmd: CreateStripeSessionCommand,
    ) -> Result<SessionHandle, FulfillmentError> {
        let user_id = validate_checkout_request(&cmd.user_id, &cmd.email, &cmd.cart)?;

        let session = self
            .gateway
            .create_session(&cmd.cart, &cmd.email, &user_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Stripe checkout session creation failed");
                FulfillmentError::Provider("Unable to create checkout session".to_string())
            })?;

        tracing::info!(session_id = %session.provider_session_id, "checkout session created");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::foundation::{ProductId, UserId};
    use crate::ports::GatewayError;

    struct FakeStripeGateway {
        requests: Mutex<Vec<usize>>,
        fail: bool,
    }

    #[async_trait]
    impl StripeCheckout for FakeStripeGateway {
        async fn create_session(
            &self,
            cart: &[CartItem],
            _buyer_email: &str,
            _user_id: &UserId,
        ) -> Result<SessionHandle, GatewayError> {
            if self.fail {
                return Err(GatewayError::Provider("rate limited".to_string()));
            }
            self.requests.lock().unwrap().push(cart.len());
            Ok(SessionHandle {
                redirect_url: "https://checkout.stripe.com/pay/cs_test".to_string(),
                provider_session_id: "cs_test_1".to_string(),
            })
        }
    }

    fn cart() -> Vec<CartItem> {
        vec![CartItem {
            product_id: ProductId::new("p1").unwrap(),
            title: "Game".to_string(),
            unit_price: 19.99,
            quantity: 1,
            region: None,
            image: None,
        }]
    }

    #[tokio::test]
    async fn valid_command_returns_session_handle() {
        let handler = CreateStripeSessionHandler::new(Arc::new(FakeStripeGateway {
            requests: Mutex::new(Vec::new()),
            fail: false,
        }));

        let session = handler
            .handle(CreateStripeSessionCommand {
                cart: cart(),
                email: "a@b.com".to_string(),
                user_id: "user-1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.provider_session_id, "cs_test_1");
    }

    #[tokio::test]
    async fn invalid_command_never_reaches_the_gateway() {
        let gateway = Arc::new(FakeStripeGateway {
            requests: Mutex::new(Vec::new()),
            fail: false,
        });
        let handler = CreateStripeSessionHandler::new(gateway.clone());

        let result = handler
            .handle(CreateStripeSessionCommand {
                cart: Vec::new(),
                email: "a@b.com".to_string(),
                user_id: "user-1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(FulfillmentError::InvalidRequest(_))));
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_maps_to_provider_error() {
        let handler = CreateStripeSessionHandler::new(Arc::new(FakeStripeGateway {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }));

        let result = handler
            .handle(CreateStripeSessionCommand {
                cart: cart(),
                email: "a@b.com".to_string(),
                user_id: "user-1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(FulfillmentError::Provider(_))));
    }
}
