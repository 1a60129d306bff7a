//! The Order aggregate.
//!
//! An order is created exactly once per confirmed payment and afterwards
//! mutated only by the finalizer, which attaches allocation results. Orders
//! are never deleted.

use serde::{Deserialize, Serialize};

use crate::domain::checkout::CartItem;
use crate::domain::foundation::{OrderId, ProductId, Timestamp, UserId};

use super::confirmation::{PaymentConfirmation, PaymentProvider};

/// Payment state as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// Overall order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Processing,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(OrderStatus::Processing),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

/// Key-delivery state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// No keys assigned yet.
    Pending,
    /// Some but not all requested keys were assigned.
    Partial,
    /// Every requested key was assigned.
    Delivered,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Partial => "partial",
            DeliveryStatus::Delivered => "delivered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DeliveryStatus::Pending),
            "partial" => Some(DeliveryStatus::Partial),
            "delivered" => Some(DeliveryStatus::Delivered),
            _ => None,
        }
    }
}

/// A game key assigned to an order, as stored on the order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedKey {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    #[serde(rename = "key")]
    pub code: String,
}

/// An order created from a confirmed payment.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,

    /// Human-readable unique order number (`ORD-…` / `RZP-…`).
    pub order_number: String,

    pub user_id: UserId,

    /// Delivery email, when the provider supplied one.
    pub buyer_email: Option<String>,

    /// Immutable cart snapshot from checkout time.
    pub cart: Vec<CartItem>,

    pub total_amount_minor: i64,
    pub currency: String,

    pub payment_provider: PaymentProvider,
    pub provider_order_ref: String,
    pub provider_payment_ref: String,

    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub delivery_status: DeliveryStatus,

    /// Keys assigned to this order, in allocation order.
    pub assigned_keys: Vec<AssignedKey>,

    /// Set when at least one key was delivered.
    pub delivered_at: Option<Timestamp>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Creates the initial order record for a confirmed payment.
    ///
    /// Payment is already settled at this point, so the order starts as
    /// `paid` / `processing` with delivery pending and no keys assigned.
    pub fn from_confirmation(confirmation: &PaymentConfirmation) -> Self {
        let now = Timestamp::now();
        Self {
            id: OrderId::new(),
            order_number: format!(
                "{}-{}",
                confirmation.provider.order_number_prefix(),
                now.as_unix_millis()
            ),
            user_id: confirmation.user_id.clone(),
            buyer_email: confirmation.buyer_email.clone(),
            cart: confirmation.cart.clone(),
            total_amount_minor: confirmation.amount_minor,
            currency: confirmation.currency.clone(),
            payment_provider: confirmation.provider,
            provider_order_ref: confirmation.provider_order_ref.clone(),
            provider_payment_ref: confirmation.provider_payment_ref.clone(),
            payment_status: PaymentStatus::Paid,
            status: OrderStatus::Processing,
            delivery_status: DeliveryStatus::Pending,
            assigned_keys: Vec::new(),
            delivered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches allocation results and derives the delivery state.
    ///
    /// `fully_granted` is true when no line item reported a shortfall.
    pub fn record_allocation(&mut self, assigned: Vec<AssignedKey>, fully_granted: bool) {
        let now = Timestamp::now();
        self.delivery_status = if assigned.is_empty() {
            DeliveryStatus::Pending
        } else if fully_granted {
            DeliveryStatus::Delivered
        } else {
            DeliveryStatus::Partial
        };
        if !assigned.is_empty() {
            self.delivered_at = Some(now);
        }
        if self.delivery_status == DeliveryStatus::Delivered {
            self.status = OrderStatus::Completed;
        }
        self.assigned_keys = assigned;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ProductId;

    fn confirmation() -> PaymentConfirmation {
        PaymentConfirmation {
            provider: PaymentProvider::Stripe,
            provider_order_ref: "cs_test_abc".to_string(),
            provider_payment_ref: "pi_test_abc".to_string(),
            amount_minor: 1999,
            currency: "INR".to_string(),
            buyer_email: Some("buyer@example.com".to_string()),
            user_id: UserId::new("user-1").unwrap(),
            cart: vec![CartItem {
                product_id: ProductId::new("p1").unwrap(),
                title: "Starfall Tactics".to_string(),
                unit_price: 19.99,
                quantity: 1,
                region: None,
                image: None,
            }],
        }
    }

    fn key(product: &str, code: &str) -> AssignedKey {
        AssignedKey {
            product_id: ProductId::new(product).unwrap(),
            code: code.to_string(),
        }
    }

    #[test]
    fn new_order_starts_paid_and_undelivered() {
        let order = Order::from_confirmation(&confirmation());

        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.delivery_status, DeliveryStatus::Pending);
        assert!(order.assigned_keys.is_empty());
        assert!(order.delivered_at.is_none());
    }

    #[test]
    fn order_number_carries_provider_prefix() {
        let order = Order::from_confirmation(&confirmation());
        assert!(order.order_number.starts_with("ORD-"));
    }

    #[test]
    fn full_allocation_marks_delivered_and_completed() {
        let mut order = Order::from_confirmation(&confirmation());

        order.record_allocation(vec![key("p1", "AAAA-BBBB")], true);

        assert_eq!(order.delivery_status, DeliveryStatus::Delivered);
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.delivered_at.is_some());
    }

    #[test]
    fn partial_allocation_marks_partial() {
        let mut order = Order::from_confirmation(&confirmation());

        order.record_allocation(vec![key("p1", "AAAA-BBBB")], false);

        assert_eq!(order.delivery_status, DeliveryStatus::Partial);
        assert_eq!(order.status, OrderStatus::Processing);
        assert!(order.delivered_at.is_some());
    }

    #[test]
    fn empty_allocation_stays_pending() {
        let mut order = Order::from_confirmation(&confirmation());

        order.record_allocation(Vec::new(), false);

        assert_eq!(order.delivery_status, DeliveryStatus::Pending);
        assert!(order.delivered_at.is_none());
    }

    #[test]
    fn status_strings_roundtrip() {
        for status in ["pending", "partial", "delivered"] {
            assert_eq!(DeliveryStatus::parse(status).unwrap().as_str(), status);
        }
        for status in ["pending", "paid", "failed"] {
            assert_eq!(PaymentStatus::parse(status).unwrap().as_str(), status);
        }
        for status in ["processing", "completed"] {
            assert_eq!(OrderStatus::parse(status).unwrap().as_str(), status);
        }
    }
}
