//! KeyPoolAllocator port - atomic reservation of game keys.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, ProductId};
use crate::domain::fulfillment::AllocationResult;

/// Port for allocating keys from the per-product inventory pool.
///
/// Contract:
/// - Grants up to `quantity` available keys for the product in ascending
///   key-id order, marking each consumed and linked to `order_id` before
///   returning.
/// - Under concurrent calls the same key is never granted twice; mutual
///   exclusion is scoped per product or per key, never across the whole
///   pool.
/// - Insufficient inventory is not an error: the result reports the
///   shortfall. An unknown product yields an empty grant with full
///   shortfall.
#[async_trait]
pub trait KeyPoolAllocator: Send + Sync {
    async fn allocate(
        &self,
        product_id: &ProductId,
        quantity: u32,
        order_id: &OrderId,
    ) -> Result<AllocationResult, DomainError>;
}
