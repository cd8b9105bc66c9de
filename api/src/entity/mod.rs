//! SeaORM entity definitions
//!
//! Table-level models for the CRM schema. These mirror `migrations/001_crm_schema.sql`
//! and are only used by the PostgreSQL adapters; the rest of the crate works with
//! the domain entities in `crate::domain::entities`.

pub mod customers;
pub mod order_products;
pub mod orders;
pub mod products;
