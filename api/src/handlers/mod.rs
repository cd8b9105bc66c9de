//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod customers;
pub mod extract;
pub mod orders;
pub mod products;

pub use customers::{bulk_create_customers, create_customer, get_customer, list_customers};
pub use orders::{create_order, get_order, list_orders};
pub use products::{create_product, get_product, list_products};
