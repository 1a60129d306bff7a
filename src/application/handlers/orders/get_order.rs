//! Fetch a single order, scoped to its owner.

use std::str::FromStr;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, OrderId, UserId};
use crate::domain::fulfillment::Order;
use crate::ports::OrderRepository;

/// Query for one order.
#[derive(Debug, Clone)]
pub struct GetOrderQuery {
    pub order_id: String,
    pub user_id: UserId,
}

/// Handler for [`GetOrderQuery`].
pub struct GetOrderHandler {
    orders: Arc<dyn OrderRepository>,
}

impl GetOrderHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    /// Returns the order when it exists and belongs to the caller.
    /// An order owned by another user is reported as absent, not forbidden.
    pub async fn handle(&self, query: GetOrderQuery) -> Result<Option<Order>, DomainError> {
        let Ok(order_id) = OrderId::from_str(&query.order_id) else {
            return Ok(None);
        };
        let order = self.orders.find_by_id(&order_id).await?;
        Ok(order.filter(|o| o.user_id == query.user_id))
    }
}
