//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod customer_repo;
mod filters;
pub mod order_repo;
pub mod product_repo;
pub mod schema;


pub use customer_repo::PostgresCustomerRepository;
pub use order_repo::PostgresOrderRepository;
pub use product_repo::PostgresProductRepository;
pub use schema::ensure_schema;
