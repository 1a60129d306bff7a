//! Wire DTOs for the order endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::checkout::CartItem;
use crate::domain::fulfillment::{AssignedKey, Order};

/// Acknowledgment body for webhook deliveries.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Request body for the client-relayed Razorpay success callback.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpaySuccessRequest {
    #[serde(rename = "orderId", default)]
    pub order_id: String,
    #[serde(rename = "paymentId", default)]
    pub payment_id: String,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "cartItems", default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub amount: f64,
}

/// Response for the Razorpay success callback.
#[derive(Debug, Clone, Serialize)]
pub struct RazorpaySuccessResponse {
    pub success: bool,
    #[serde(rename = "orderId")]
    pub order_id: String,
}

/// Full order view returned by the read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: String,
    #[serde(rename = "orderNumber")]
    pub order_number: String,
    #[serde(rename = "totalAmount")]
    pub total_amount: i64,
    pub currency: String,
    #[serde(rename = "paymentProvider")]
    pub payment_provider: String,
    #[serde(rename = "paymentStatus")]
    pub payment_status: String,
    pub status: String,
    #[serde(rename = "deliveryStatus")]
    pub delivery_status: String,
    #[serde(rename = "cartSnapshot")]
    pub cart_snapshot: Vec<CartItem>,
    #[serde(rename = "assignedKeys")]
    pub assigned_keys: Vec<AssignedKey>,
    #[serde(rename = "deliveredAt")]
    pub delivered_at: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            order_number: order.order_number,
            total_amount: order.total_amount_minor,
            currency: order.currency,
            payment_provider: order.payment_provider.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            status: order.status.as_str().to_string(),
            delivery_status: order.delivery_status.as_str().to_string(),
            cart_snapshot: order.cart,
            assigned_keys: order.assigned_keys,
            delivered_at: order.delivered_at.map(|t| t.as_datetime().to_rfc3339()),
            created_at: order.created_at.as_datetime().to_rfc3339(),
        }
    }
}
