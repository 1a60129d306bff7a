//! Pixelkeys service entry point.
//!
//! Loads configuration, connects PostgreSQL, wires the adapters into the
//! fulfillment core, and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use http::HeaderValue;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pixelkeys::adapters::email::{HtmlReceiptRenderer, ResendConfig, ResendSender};
use pixelkeys::adapters::http::checkout::{checkout_routes, CheckoutAppState};
use pixelkeys::adapters::http::orders::{order_routes, OrdersAppState};
use pixelkeys::adapters::postgres::{PostgresKeyPool, PostgresOrderRepository};
use pixelkeys::adapters::razorpay::{RazorpayConfig, RazorpayGateway};
use pixelkeys::adapters::stripe::{StripeCheckoutGateway, StripeConfig};
use pixelkeys::config::AppConfig;
use pixelkeys::domain::fulfillment::{
    OrderFinalizer, RazorpaySignatureVerifier, StripeWebhookVerifier,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        stripe_test_mode = config.payment.is_test_mode(),
        "starting pixelkeys"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    // Ports wired to their production adapters.
    let orders = Arc::new(PostgresOrderRepository::new(pool.clone()));
    let key_pool = Arc::new(PostgresKeyPool::new(pool.clone()));
    let renderer = Arc::new(HtmlReceiptRenderer::new(config.payment.frontend_url.clone()));
    let notifier = Arc::new(ResendSender::new(ResendConfig::new(
        SecretString::new(config.email.resend_api_key.clone()),
        config.email.from_header(),
    )));
    let finalizer = Arc::new(OrderFinalizer::new(
        orders.clone(),
        key_pool,
        renderer,
        notifier,
    ));

    let checkout_state = CheckoutAppState {
        stripe_gateway: Arc::new(StripeCheckoutGateway::new(StripeConfig::new(
            SecretString::new(config.payment.stripe_secret_key.clone()),
            config.payment.frontend_url.clone(),
        ))),
        razorpay_gateway: Arc::new(RazorpayGateway::new(RazorpayConfig::new(
            config.payment.razorpay_key_id.clone(),
            SecretString::new(config.payment.razorpay_key_secret.clone()),
        ))),
        razorpay_verifier: Arc::new(RazorpaySignatureVerifier::new(SecretString::new(
            config.payment.razorpay_key_secret.clone(),
        ))),
    };

    let orders_state = OrdersAppState {
        stripe_verifier: Arc::new(StripeWebhookVerifier::new(SecretString::new(
            config.payment.stripe_webhook_secret.clone(),
        ))),
        finalizer,
        orders,
    };

    let cors = {
        let origins = config.server.cors_origins_list();
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        if origins.is_empty() {
            cors.allow_origin(Any)
        } else {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .map(|o| o.parse())
                .collect::<Result<_, _>>()?;
            cors.allow_origin(origins)
        }
    };

    let app = Router::new()
        .route("/health", get(health))
        .nest("/checkout", checkout_routes().with_state(checkout_state))
        .nest("/orders", order_routes().with_state(orders_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                ))),
        );

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
