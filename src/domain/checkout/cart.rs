//! Cart line items as immutable snapshots taken at checkout time.
//!
//! The same shape is used for the incoming checkout request, the snapshot
//! embedded in provider session metadata, and the cart stored on the order,
//! so a confirmation can reconstruct the purchase without re-querying the
//! original request.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProductId, ValidationError};

/// A single purchased line item.
///
/// Prices arrive from the storefront as decimal currency units; all provider
/// and order amounts are integer minor units (paise/cents) computed with
/// round-half-up to avoid floating-point drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog product id.
    #[serde(rename = "id")]
    pub product_id: ProductId,

    /// Product title at purchase time.
    pub title: String,

    /// Unit price in decimal currency units.
    #[serde(rename = "price")]
    pub unit_price: f64,

    /// Purchased quantity; at least 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Key region restriction, if the product is region-locked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Product image reference for the provider's checkout page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

impl CartItem {
    /// Validates the snapshot invariants: positive quantity, non-negative price.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity < 1 {
            return Err(ValidationError::below_minimum("quantity", 1, i64::from(self.quantity)));
        }
        if self.unit_price < 0.0 {
            return Err(ValidationError::invalid_format(
                "price",
                "unit price cannot be negative",
            ));
        }
        Ok(())
    }

    /// Unit price in integer minor units, rounded half-up.
    pub fn unit_price_minor(&self) -> i64 {
        to_minor_units(self.unit_price)
    }

    /// Line total (unit price times quantity) in minor units.
    pub fn line_total_minor(&self) -> i64 {
        self.unit_price_minor() * i64::from(self.quantity)
    }
}

/// Converts a decimal currency amount to integer minor units, half-up.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0 + 0.5).floor() as i64
}

/// Total of all line items in minor units.
pub fn cart_total_minor(items: &[CartItem]) -> i64 {
    items.iter().map(CartItem::line_total_minor).sum()
}
