//! In-memory order repository.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, UserId};
use crate::domain::fulfillment::{Order, PaymentProvider};
use crate::ports::{InsertOutcome, OrderRepository};

/// In-memory implementation of [`OrderRepository`].
///
/// Mirrors the database's uniqueness guarantee on
/// `(payment_provider, provider_order_ref)` by checking and inserting under
/// one lock.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: &Order) -> Result<InsertOutcome, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let duplicate = orders.iter().any(|o| {
            o.payment_provider == order.payment_provider
                && o.provider_order_ref == order.provider_order_ref
        });
        if duplicate {
            return Ok(InsertOutcome::AlreadyExists);
        }
        orders.push(order.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_provider_ref(
        &self,
        provider: PaymentProvider,
        provider_order_ref: &str,
    ) -> Result<Option<Order>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.payment_provider == provider && o.provider_order_ref == provider_order_ref)
            .cloned())
    }

    async fn update_delivery(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let stored = orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or_else(|| DomainError::order_not_found(order.id))?;
        *stored = order.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| &o.id == id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
