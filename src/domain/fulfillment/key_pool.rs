//! Game-key inventory records and allocation results.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{KeyId, OrderId, ProductId, Timestamp};

/// A pre-provisioned license key in the inventory pool.
///
/// Keys are created out-of-band. `is_available` transitions true -> false
/// exactly once, under the allocator's exclusive control; an unavailable key
/// always carries the order it was assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub id: KeyId,
    pub product_id: ProductId,
    pub code: String,
    pub is_available: bool,
    pub assigned_at: Option<Timestamp>,
    pub assigned_order_id: Option<OrderId>,
}

impl KeyRecord {
    /// Creates an unassigned key.
    pub fn available(id: KeyId, product_id: ProductId, code: impl Into<String>) -> Self {
        Self {
            id,
            product_id,
            code: code.into(),
            is_available: true,
            assigned_at: None,
            assigned_order_id: None,
        }
    }

    /// Claims the key for an order. Returns false if the key was already
    /// consumed; the transition is irreversible.
    pub fn claim(&mut self, order_id: OrderId) -> bool {
        if !self.is_available {
            return false;
        }
        self.is_available = false;
        self.assigned_at = Some(Timestamp::now());
        self.assigned_order_id = Some(order_id);
        true
    }
}

/// Outcome of a key-pool allocation for one line item.
///
/// A shortfall is not an error: the allocator grants what exists and the
/// caller records partial delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationResult {
    /// Keys granted to the order, ascending by key id.
    pub granted: Vec<KeyRecord>,
    /// Count of requested keys that could not be granted.
    pub shortfall: u32,
}

impl AllocationResult {
    /// An allocation that granted nothing (unknown product or store fault).
    pub fn none(requested: u32) -> Self {
        Self {
            granted: Vec::new(),
            shortfall: requested,
        }
    }

    /// True when every requested key was granted.
    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> KeyRecord {
        KeyRecord::available(KeyId::new(1), ProductId::new("p1").unwrap(), "AAAA-1111")
    }

    #[test]
    fn claim_consumes_key_and_links_order() {
        let mut key = record();
        let order = OrderId::new();

        assert!(key.claim(order));

        assert!(!key.is_available);
        assert_eq!(key.assigned_order_id, Some(order));
        assert!(key.assigned_at.is_some());
    }

    #[test]
    fn claim_is_irreversible() {
        let mut key = record();
        let first = OrderId::new();
        assert!(key.claim(first));

        assert!(!key.claim(OrderId::new()));
        assert_eq!(key.assigned_order_id, Some(first));
    }

    #[test]
    fn empty_allocation_reports_full_shortfall() {
        let result = AllocationResult::none(3);
        assert_eq!(result.shortfall, 3);
        assert!(result.granted.is_empty());
        assert!(!result.is_complete());
    }

    #[test]
    fn zero_shortfall_is_complete() {
        let result = AllocationResult {
            granted: vec![record()],
            shortfall: 0,
        };
        assert!(result.is_complete());
    }
}
