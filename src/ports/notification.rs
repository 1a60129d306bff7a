//! Notification ports - receipt rendering and email dispatch.
//!
//! Failures here must never roll back an order or its key allocation; the
//! finalizer logs them and proceeds.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::fulfillment::Order;

/// Email dispatch failure.
#[derive(Debug, Error)]
#[error("Notification failed: {0}")]
pub struct NotificationError(pub String);

/// Port for sending a rendered notification email.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotificationError>;
}

/// Port for rendering the receipt/keys email body.
///
/// Keeps HTML templating out of the fulfillment core.
pub trait ReceiptRenderer: Send + Sync {
    fn render(&self, order: &Order) -> String;
}
