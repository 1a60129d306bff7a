//! HTTP handlers for order endpoints.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::{ApiError, ErrorResponse};
use crate::application::handlers::orders::{
    GetOrderHandler, GetOrderQuery, ListOrdersHandler, ListOrdersQuery,
    ProcessRazorpaySuccessCommand, ProcessRazorpaySuccessHandler, ProcessStripeWebhookCommand,
    ProcessStripeWebhookHandler,
};
use crate::domain::foundation::UserId;
use crate::domain::fulfillment::{OrderFinalizer, StripeWebhookVerifier};
use crate::ports::OrderRepository;

use super::dto::{OrderResponse, RazorpaySuccessRequest, RazorpaySuccessResponse, WebhookAck};

/// Shared state for the orders router.
#[derive(Clone)]
pub struct OrdersAppState {
    pub stripe_verifier: Arc<StripeWebhookVerifier>,
    pub finalizer: Arc<OrderFinalizer>,
    pub orders: Arc<dyn OrderRepository>,
}

impl OrdersAppState {
    fn webhook_handler(&self) -> ProcessStripeWebhookHandler {
        ProcessStripeWebhookHandler::new(self.stripe_verifier.clone(), self.finalizer.clone())
    }

    fn razorpay_success_handler(&self) -> ProcessRazorpaySuccessHandler {
        ProcessRazorpaySuccessHandler::new(self.finalizer.clone(), self.orders.clone())
    }

    fn get_order_handler(&self) -> GetOrderHandler {
        GetOrderHandler::new(self.orders.clone())
    }

    fn list_orders_handler(&self) -> ListOrdersHandler {
        ListOrdersHandler::new(self.orders.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User context (stands in for the external authorization collaborator)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user extracted from the request.
///
/// The real deployment sits behind a gateway that authenticates the caller
/// and forwards the account id in `X-User-Id`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment callbacks (no auth; verified by signature or upstream flow)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /orders/stripe/webhook - Stripe payment confirmation.
///
/// The body must be the raw bytes Stripe sent; any re-serialization breaks
/// signature verification. Processed, duplicate, and ignored events are all
/// acknowledged with 200 so Stripe stops retrying.
pub async fn stripe_webhook(
    State(state): State<OrdersAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError(crate::domain::fulfillment::FulfillmentError::InvalidRequest(
                "Missing stripe-signature header".to_string(),
            ))
        })?;

    state
        .webhook_handler()
        .handle(ProcessStripeWebhookCommand {
            payload: body.to_vec(),
            signature_header: signature.to_string(),
        })
        .await?;

    Ok(Json(WebhookAck { received: true }))
}

/// POST /orders/razorpay/success - client-relayed Razorpay confirmation.
pub async fn razorpay_success(
    State(state): State<OrdersAppState>,
    Json(request): Json<RazorpaySuccessRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .razorpay_success_handler()
        .handle(ProcessRazorpaySuccessCommand {
            order_id: request.order_id,
            payment_id: request.payment_id,
            user_id: request.user_id,
            email: request.email,
            cart_items: request.cart_items,
            amount: request.amount,
        })
        .await?;

    Ok(Json(RazorpaySuccessResponse {
        success: true,
        order_id: order.id.to_string(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Reads (authenticated, user-scoped)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /orders - the caller's order history.
pub async fn list_orders(
    State(state): State<OrdersAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .list_orders_handler()
        .handle(ListOrdersQuery {
            user_id: user.user_id,
        })
        .await?;

    let response: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(Json(response))
}

/// GET /orders/:id - one of the caller's orders.
pub async fn get_order(
    State(state): State<OrdersAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .get_order_handler()
        .handle(GetOrderQuery {
            order_id: id,
            user_id: user.user_id,
        })
        .await?;

    match order {
        Some(order) => Ok(Json(OrderResponse::from(order)).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Order not found")),
        )
            .into_response()),
    }
}
