//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, validation and ports.

pub mod customer_service;
pub mod order_service;
pub mod product_service;

pub use customer_service::{CustomerService, CUSTOMER_CREATED_MESSAGE};
pub use order_service::{OrderService, ORDER_CREATED_MESSAGE};
pub use product_service::{ProductService, PRODUCT_CREATED_MESSAGE};
