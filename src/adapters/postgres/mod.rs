//! PostgreSQL adapter implementations (sqlx).

mod key_pool;
mod order_repository;

pub use key_pool::PostgresKeyPool;
pub use order_repository::PostgresOrderRepository;
