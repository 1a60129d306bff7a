//! PostgreSQL implementation of OrderRepository.
//!
//! Idempotency rides on the `orders_provider_ref_key` unique constraint:
//! concurrent duplicate confirmations race on the insert and exactly one
//! wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, Timestamp, UserId};
use crate::domain::fulfillment::{
    DeliveryStatus, Order, OrderStatus, PaymentProvider, PaymentStatus,
};
use crate::ports::{InsertOutcome, OrderRepository};

/// PostgreSQL implementation of the [`OrderRepository`] port.
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    user_id: String,
    buyer_email: Option<String>,
    cart_snapshot: serde_json::Value,
    total_amount: i64,
    currency: String,
    payment_provider: String,
    provider_order_ref: String,
    provider_payment_ref: String,
    payment_status: String,
    status: String,
    delivery_status: String,
    assigned_keys: serde_json::Value,
    delivered_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let invalid = |what: &str, value: &str| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid {} value: {}", what, value),
            )
        };

        Ok(Order {
            id: OrderId::from_uuid(row.id),
            order_number: row.order_number,
            user_id: UserId::new(row.user_id)
                .map_err(|e| invalid("user_id", &e.to_string()))?,
            buyer_email: row.buyer_email,
            cart: serde_json::from_value(row.cart_snapshot)
                .map_err(|e| invalid("cart_snapshot", &e.to_string()))?,
            total_amount_minor: row.total_amount,
            currency: row.currency,
            payment_provider: PaymentProvider::parse(&row.payment_provider)
                .ok_or_else(|| invalid("payment_provider", &row.payment_provider))?,
            provider_order_ref: row.provider_order_ref,
            provider_payment_ref: row.provider_payment_ref,
            payment_status: PaymentStatus::parse(&row.payment_status)
                .ok_or_else(|| invalid("payment_status", &row.payment_status))?,
            status: OrderStatus::parse(&row.status)
                .ok_or_else(|| invalid("status", &row.status))?,
            delivery_status: DeliveryStatus::parse(&row.delivery_status)
                .ok_or_else(|| invalid("delivery_status", &row.delivery_status))?,
            assigned_keys: serde_json::from_value(row.assigned_keys)
                .map_err(|e| invalid("assigned_keys", &e.to_string()))?,
            delivered_at: row.delivered_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn json_err(context: &str, e: serde_json::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const SELECT_ORDER: &str = r#"
    SELECT id, order_number, user_id, buyer_email, cart_snapshot, total_amount,
           currency, payment_provider, provider_order_ref, provider_payment_ref,
           payment_status, status, delivery_status, assigned_keys, delivered_at,
           created_at, updated_at
    FROM orders
"#;

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: &Order) -> Result<InsertOutcome, DomainError> {
        let cart = serde_json::to_value(&order.cart).map_err(|e| json_err("cart", e))?;
        let keys =
            serde_json::to_value(&order.assigned_keys).map_err(|e| json_err("keys", e))?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, user_id, buyer_email, cart_snapshot, total_amount,
                currency, payment_provider, provider_order_ref, provider_payment_ref,
                payment_status, status, delivery_status, assigned_keys, delivered_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT ON CONSTRAINT orders_provider_ref_key DO NOTHING
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(&order.order_number)
        .bind(order.user_id.as_str())
        .bind(&order.buyer_email)
        .bind(cart)
        .bind(order.total_amount_minor)
        .bind(&order.currency)
        .bind(order.payment_provider.as_str())
        .bind(&order.provider_order_ref)
        .bind(&order.provider_payment_ref)
        .bind(order.payment_status.as_str())
        .bind(order.status.as_str())
        .bind(order.delivery_status.as_str())
        .bind(keys)
        .bind(order.delivered_at.map(|t| *t.as_datetime()))
        .bind(order.created_at.as_datetime())
        .bind(order.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert order", e))?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::AlreadyExists)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    async fn find_by_provider_ref(
        &self,
        provider: PaymentProvider,
        provider_order_ref: &str,
    ) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "{} WHERE payment_provider = $1 AND provider_order_ref = $2",
            SELECT_ORDER
        ))
        .bind(provider.as_str())
        .bind(provider_order_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to query order by provider ref", e))?;

        row.map(Order::try_from).transpose()
    }

    async fn update_delivery(&self, order: &Order) -> Result<(), DomainError> {
        let keys =
            serde_json::to_value(&order.assigned_keys).map_err(|e| json_err("keys", e))?;

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = $2,
                delivery_status = $3,
                assigned_keys = $4,
                delivered_at = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.status.as_str())
        .bind(order.delivery_status.as_str())
        .bind(keys)
        .bind(order.delivered_at.map(|t| *t.as_datetime()))
        .bind(order.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update order delivery", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::order_not_found(order.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_ORDER))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_err("Failed to query order by id", e))?;

        row.map(Order::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, DomainError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_ORDER
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list orders", e))?;

        rows.into_iter().map(Order::try_from).collect()
    }
}
