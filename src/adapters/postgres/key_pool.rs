//! PostgreSQL implementation of KeyPoolAllocator.
//!
//! Claims keys with a single `UPDATE … WHERE id IN (SELECT … FOR UPDATE SKIP
//! LOCKED)` statement: each key row is locked individually, so concurrent
//! allocations for the same product take disjoint keys and unrelated
//! products never contend. Fewer returned rows than requested is a
//! shortfall, not an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, KeyId, OrderId, ProductId, Timestamp};
use crate::domain::fulfillment::{AllocationResult, KeyRecord};
use crate::ports::KeyPoolAllocator;

/// PostgreSQL implementation of the [`KeyPoolAllocator`] port.
pub struct PostgresKeyPool {
    pool: PgPool,
}

impl PostgresKeyPool {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct KeyRow {
    id: i64,
    product_id: String,
    code: String,
    is_available: bool,
    assigned_at: Option<DateTime<Utc>>,
    assigned_order_id: Option<Uuid>,
}

impl TryFrom<KeyRow> for KeyRecord {
    type Error = DomainError;

    fn try_from(row: KeyRow) -> Result<Self, Self::Error> {
        Ok(KeyRecord {
            id: KeyId::new(row.id),
            product_id: ProductId::new(row.product_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid product_id: {}", e))
            })?,
            code: row.code,
            is_available: row.is_available,
            assigned_at: row.assigned_at.map(Timestamp::from_datetime),
            assigned_order_id: row.assigned_order_id.map(OrderId::from_uuid),
        })
    }
}

#[async_trait]
impl KeyPoolAllocator for PostgresKeyPool {
    async fn allocate(
        &self,
        product_id: &ProductId,
        quantity: u32,
        order_id: &OrderId,
    ) -> Result<AllocationResult, DomainError> {
        let rows: Vec<KeyRow> = sqlx::query_as(
            r#"
            UPDATE game_keys
            SET is_available = FALSE,
                assigned_at = NOW(),
                assigned_order_id = $3
            WHERE id IN (
                SELECT id FROM game_keys
                WHERE product_id = $1 AND is_available
                ORDER BY id
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, product_id, code, is_available, assigned_at, assigned_order_id
            "#,
        )
        .bind(product_id.as_str())
        .bind(i64::from(quantity))
        .bind(order_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to allocate keys: {}", e),
            )
        })?;

        let mut granted = rows
            .into_iter()
            .map(KeyRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        // RETURNING order is unspecified; the contract is ascending key id.
        granted.sort_by_key(|k| k.id);

        let shortfall = quantity.saturating_sub(granted.len() as u32);
        Ok(AllocationResult { granted, shortfall })
    }
}
