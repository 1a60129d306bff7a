//! List the caller's orders.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::fulfillment::Order;
use crate::ports::OrderRepository;

/// Query for a user's order history.
#[derive(Debug, Clone)]
pub struct ListOrdersQuery {
    pub user_id: UserId,
}

/// Handler for [`ListOrdersQuery`].
pub struct ListOrdersHandler {
    orders: Arc<dyn OrderRepository>,
}

impl ListOrdersHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn handle(&self, query: ListOrdersQuery) -> Result<Vec<Order>, DomainError> {
        self.orders.list_for_user(&query.user_id).await
    }
}
