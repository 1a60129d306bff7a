//! Foundation types shared across the domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{KeyId, OrderId, ProductId, UserId};
pub use timestamp::Timestamp;
