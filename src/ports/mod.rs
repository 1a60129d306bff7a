//! Ports - interfaces the domain and application layers depend on.
//!
//! Adapters under `crate::adapters` provide the implementations.

mod checkout_gateway;
mod key_pool;
mod notification;
mod order_repository;

pub use checkout_gateway::{
    GatewayError, ProviderOrderHandle, RazorpayCheckout, SessionHandle, StripeCheckout,
};
pub use key_pool::KeyPoolAllocator;
pub use notification::{NotificationError, NotificationSender, ReceiptRenderer};
pub use order_repository::{InsertOutcome, OrderRepository};
