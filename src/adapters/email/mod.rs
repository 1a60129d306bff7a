//! Email adapters - Resend dispatch and receipt rendering.

mod receipt;
mod resend_sender;

pub use receipt::HtmlReceiptRenderer;
pub use resend_sender::{ResendConfig, ResendSender};
