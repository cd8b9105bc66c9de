//! CRM API Server
//!
//! Customers, products and orders over HTTP, persisted in PostgreSQL.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    ensure_schema, PostgresCustomerRepository, PostgresOrderRepository, PostgresProductRepository,
};
use app::{CustomerService, OrderService, ProductService};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub customer_service: Arc<CustomerService<PostgresCustomerRepository>>,
    pub product_service: Arc<ProductService<PostgresProductRepository>>,
    pub order_service: Arc<OrderService<PostgresOrderRepository>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn router(state: AppState) -> Router {
    let cors = if state.config.cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/health", get(health))
        // Customers
        .route(
            "/customers",
            post(handlers::create_customer).get(handlers::list_customers),
        )
        .route("/customers/bulk", post(handlers::bulk_create_customers))
        .route("/customers/:id", get(handlers::get_customer))
        // Products
        .route(
            "/products",
            post(handlers::create_product).get(handlers::list_products),
        )
        .route("/products/:id", get(handlers::get_product))
        // Orders
        .route(
            "/orders",
            post(handlers::create_order).get(handlers::list_orders),
        )
        .route("/orders/:id", get(handlers::get_order))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crm_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CRM API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if config.bootstrap_schema {
        ensure_schema(&db)
            .await
            .context("Failed to bootstrap database schema")?;
    }

    // Create adapters
    let customer_repo = Arc::new(PostgresCustomerRepository::new(db.clone()));
    let product_repo = Arc::new(PostgresProductRepository::new(db.clone()));
    let order_repo = Arc::new(PostgresOrderRepository::new(db.clone()));

    // Create app state
    let state = AppState {
        customer_service: Arc::new(CustomerService::new(customer_repo)),
        product_service: Arc::new(ProductService::new(product_repo)),
        order_service: Arc::new(OrderService::new(order_repo)),
        config: config.clone(),
    };

    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
