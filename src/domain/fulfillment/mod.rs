//! Fulfillment domain - payment confirmation, key allocation, and order
//! finalization.
//!
//! This is the core of the service: the workflow that turns a verified
//! payment confirmation into exactly one order with uniquely assigned game
//! keys, tolerating duplicate confirmations, inventory shortfalls, and
//! notification failures.

mod confirmation;
mod errors;
mod finalizer;
mod key_pool;
mod order;
mod razorpay_verifier;
mod stripe_event;
mod stripe_verifier;

pub use confirmation::{PaymentConfirmation, PaymentProvider};
pub use errors::FulfillmentError;
pub use finalizer::{FinalizeOutcome, OrderFinalizer};
pub use key_pool::{AllocationResult, KeyRecord};
pub use order::{AssignedKey, DeliveryStatus, Order, OrderStatus, PaymentStatus};
pub use razorpay_verifier::RazorpaySignatureVerifier;
pub use stripe_event::{CheckoutSessionObject, StripeEvent};
pub use stripe_verifier::{SignatureHeader, StripeWebhookVerifier};
