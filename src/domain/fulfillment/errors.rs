//! Fulfillment error taxonomy.
//!
//! Status-code mapping determines the payment provider's retry behavior:
//! 2xx acknowledges (including intentionally ignored events), 4xx rejects
//! without retry, 5xx invites a retry. Once an order exists, the workflow
//! must never surface a 5xx for that confirmation - duplicates produced by
//! provider retries are absorbed by the idempotency check instead.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that occur while processing a checkout or confirmation.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// Required input missing or empty (client error).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Signature verification failed.
    #[error("Invalid payment signature")]
    InvalidSignature,

    /// Webhook event is older than the replay window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Webhook event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Payload or signature header could not be parsed.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Required field missing from the provider session metadata.
    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    /// Required field missing from the provider event object.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Event was intentionally ignored (not a failure; acknowledged 2xx).
    #[error("Event ignored: {0}")]
    Ignored(String),

    /// Persistence failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Payment-provider API failure.
    #[error("Provider error: {0}")]
    Provider(String),
}

impl FulfillmentError {
    /// True if the provider should retry delivering the confirmation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FulfillmentError::Store(_) | FulfillmentError::Provider(_)
        )
    }

    /// Maps the error to the HTTP status the caller should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Rejected without retry
            FulfillmentError::InvalidRequest(_)
            | FulfillmentError::InvalidSignature
            | FulfillmentError::TimestampOutOfRange
            | FulfillmentError::InvalidTimestamp
            | FulfillmentError::MalformedPayload(_)
            | FulfillmentError::MissingMetadata(_)
            | FulfillmentError::MissingField(_) => StatusCode::BAD_REQUEST,

            // Acknowledged so the provider stops retrying
            FulfillmentError::Ignored(_) => StatusCode::OK,

            // Infrastructure faults - retry is safe before order creation
            FulfillmentError::Store(_) | FulfillmentError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DomainError> for FulfillmentError {
    fn from(err: DomainError) -> Self {
        FulfillmentError::Store(err.to_string())
    }
}
