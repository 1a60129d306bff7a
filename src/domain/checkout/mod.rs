//! Checkout domain - cart snapshots and line-item amount math.

mod cart;

pub use cart::{cart_total_minor, to_minor_units, CartItem};
