//! Order HTTP endpoints: payment callbacks and user-scoped reads.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::OrdersAppState;
pub use routes::order_routes;
