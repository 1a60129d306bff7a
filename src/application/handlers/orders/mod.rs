//! Order handlers - confirmation processing and user-scoped queries.

mod get_order;
mod list_orders;
mod process_razorpay_success;
mod process_stripe_webhook;

pub use get_order::{GetOrderHandler, GetOrderQuery};
pub use list_orders::{ListOrdersHandler, ListOrdersQuery};
pub use process_razorpay_success::{ProcessRazorpaySuccessCommand, ProcessRazorpaySuccessHandler};
pub use process_stripe_webhook::{
    ProcessStripeWebhookCommand, ProcessStripeWebhookHandler, WebhookOutcome,
};
