//! OrderRepository port - persistent storage for orders.
//!
//! Idempotency contract: `insert` must be backed by a uniqueness guarantee
//! on `(payment_provider, provider_order_ref)` so that concurrent duplicate
//! confirmations race safely - first to insert wins, the rest observe
//! `AlreadyExists`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, UserId};
use crate::domain::fulfillment::{Order, PaymentProvider};

/// Result of attempting to insert an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// First order for this provider reference.
    Inserted,
    /// An order with the same provider reference already exists.
    AlreadyExists,
}

/// Port for order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts a new order, refusing duplicates by provider reference.
    async fn insert(&self, order: &Order) -> Result<InsertOutcome, DomainError>;

    /// Looks up an order by its provider order reference.
    async fn find_by_provider_ref(
        &self,
        provider: PaymentProvider,
        provider_order_ref: &str,
    ) -> Result<Option<Order>, DomainError>;

    /// Persists the delivery fields written by the finalizer: status,
    /// delivery status, assigned keys, and delivery timestamp.
    async fn update_delivery(&self, order: &Order) -> Result<(), DomainError>;

    /// Looks up an order by id.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// Lists a user's orders, most recent first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, DomainError>;
}
