//! In-memory key pool with per-product mutual exclusion.
//!
//! Each product's keys sit behind their own `tokio::sync::Mutex`, held for
//! the whole select-and-mark step, so concurrent allocations for the same
//! product serialize while unrelated products proceed in parallel - the same
//! isolation the PostgreSQL adapter gets from row locks.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{DomainError, KeyId, OrderId, ProductId};
use crate::domain::fulfillment::{AllocationResult, KeyRecord};
use crate::ports::KeyPoolAllocator;

type ProductPool = Arc<Mutex<Vec<KeyRecord>>>;

/// In-memory implementation of [`KeyPoolAllocator`].
#[derive(Default)]
pub struct InMemoryKeyPool {
    pools: RwLock<HashMap<ProductId, ProductPool>>,
}

impl InMemoryKeyPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisions `codes` as available keys for a product, continuing the
    /// product's ascending id sequence.
    pub async fn provision(&self, product_id: &ProductId, codes: &[&str]) {
        let pool = self.pool_for(product_id).await;
        let mut keys = pool.lock().await;
        let next_id = keys.iter().map(|k| k.id.as_i64()).max().unwrap_or(0) + 1;
        for (offset, code) in codes.iter().enumerate() {
            keys.push(KeyRecord::available(
                KeyId::new(next_id + offset as i64),
                product_id.clone(),
                *code,
            ));
        }
    }

    /// Counts the remaining available keys for a product.
    pub async fn available_count(&self, product_id: &ProductId) -> usize {
        match self.pools.read().await.get(product_id) {
            Some(pool) => pool.lock().await.iter().filter(|k| k.is_available).count(),
            None => 0,
        }
    }

    /// Snapshot of every key record, across all products.
    pub async fn all_keys(&self) -> Vec<KeyRecord> {
        let pools = self.pools.read().await;
        let mut all = Vec::new();
        for pool in pools.values() {
            all.extend(pool.lock().await.iter().cloned());
        }
        all
    }

    async fn pool_for(&self, product_id: &ProductId) -> ProductPool {
        if let Some(pool) = self.pools.read().await.get(product_id) {
            return pool.clone();
        }
        let mut pools = self.pools.write().await;
        pools
            .entry(product_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }
}

#[async_trait]
impl KeyPoolAllocator for InMemoryKeyPool {
    async fn allocate(
        &self,
        product_id: &ProductId,
        quantity: u32,
        order_id: &OrderId,
    ) -> Result<AllocationResult, DomainError> {
        let Some(pool) = self.pools.read().await.get(product_id).cloned() else {
            // Unknown product: full shortfall, caller logs it.
            return Ok(AllocationResult::none(quantity));
        };

        // Exclusive section per product: select, mark, and return without
        // letting a concurrent allocation observe the same keys.
        let mut keys = pool.lock().await;
        keys.sort_by_key(|k| k.id);

        let mut granted = Vec::new();
        for key in keys.iter_mut() {
            if granted.len() as u32 == quantity {
                break;
            }
            if key.claim(*order_id) {
                granted.push(key.clone());
            }
        }

        let shortfall = quantity - granted.len() as u32;
        Ok(AllocationResult { granted, shortfall })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::collections::HashSet;

    fn product(id: &str) -> ProductId {
        ProductId::new(id).unwrap()
    }

    #[tokio::test]
    async fn allocates_in_ascending_id_order() {
        let pool = InMemoryKeyPool::new();
        pool.provision(&product("p1"), &["K1", "K2", "K3"]).await;

        let result = pool.allocate(&product("p1"), 2, &OrderId::new()).await.unwrap();

        let codes: Vec<_> = result.granted.iter().map(|k| k.code.as_str()).collect();
        assert_eq!(codes, vec!["K1", "K2"]);
        assert!(result.is_complete());
        assert_eq!(pool.available_count(&product("p1")).await, 1);
    }

    #[tokio::test]
    async fn shortfall_grants_what_exists() {
        let pool = InMemoryKeyPool::new();
        pool.provision(&product("p1"), &["K1"]).await;

        let result = pool.allocate(&product("p1"), 3, &OrderId::new()).await.unwrap();

        assert_eq!(result.granted.len(), 1);
        assert_eq!(result.shortfall, 2);
    }

    #[tokio::test]
    async fn unknown_product_reports_full_shortfall() {
        let pool = InMemoryKeyPool::new();

        let result = pool.allocate(&product("ghost"), 2, &OrderId::new()).await.unwrap();

        assert!(result.granted.is_empty());
        assert_eq!(result.shortfall, 2);
    }

    #[tokio::test]
    async fn granted_keys_carry_the_order_link() {
        let pool = InMemoryKeyPool::new();
        pool.provision(&product("p1"), &["K1"]).await;
        let order = OrderId::new();

        let result = pool.allocate(&product("p1"), 1, &order).await.unwrap();

        assert_eq!(result.granted[0].assigned_order_id, Some(order));
        assert!(result.granted[0].assigned_at.is_some());
    }

    #[tokio::test]
    async fn concurrent_allocations_never_share_a_key() {
        let pool = Arc::new(InMemoryKeyPool::new());
        let codes: Vec<String> = (0..20).map(|i| format!("K{:02}", i)).collect();
        let code_refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        pool.provision(&product("p1"), &code_refs).await;

        // 8 orders racing for 3 keys each: 24 requested, 20 exist.
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    pool.allocate(&product("p1"), 3, &OrderId::new()).await.unwrap()
                })
            })
            .collect();

        let results: Vec<AllocationResult> =
            join_all(tasks).await.into_iter().map(|r| r.unwrap()).collect();

        let granted: Vec<String> = results
            .iter()
            .flat_map(|r| r.granted.iter().map(|k| k.code.clone()))
            .collect();
        let distinct: HashSet<&String> = granted.iter().collect();

        assert_eq!(granted.len(), 20, "every existing key is granted exactly once");
        assert_eq!(distinct.len(), 20, "no key granted twice");
        let total_shortfall: u32 = results.iter().map(|r| r.shortfall).sum();
        assert_eq!(total_shortfall, 4);
        assert_eq!(pool.available_count(&product("p1")).await, 0);
    }

    #[tokio::test]
    async fn last_key_goes_to_exactly_one_of_two_racers() {
        let pool = Arc::new(InMemoryKeyPool::new());
        pool.provision(&product("p2"), &["LAST"]).await;

        let a = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.allocate(&product("p2"), 1, &OrderId::new()).await.unwrap() })
        };
        let b = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.allocate(&product("p2"), 1, &OrderId::new()).await.unwrap() })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        let granted = a.granted.len() + b.granted.len();
        let shortfall = a.shortfall + b.shortfall;
        assert_eq!(granted, 1);
        assert_eq!(shortfall, 1);
    }

    #[tokio::test]
    async fn products_do_not_contend_with_each_other() {
        let pool = InMemoryKeyPool::new();
        pool.provision(&product("p1"), &["A1"]).await;
        pool.provision(&product("p2"), &["B1"]).await;

        let r1 = pool.allocate(&product("p1"), 1, &OrderId::new()).await.unwrap();
        let r2 = pool.allocate(&product("p2"), 1, &OrderId::new()).await.unwrap();

        assert!(r1.is_complete());
        assert!(r2.is_complete());
    }
}
