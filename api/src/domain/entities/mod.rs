//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{Customer, CustomerId, CustomerInput, NewCustomer};
pub use order::{sum_prices, Order, OrderId, OrderInput, OrderRecord};
pub use product::{NewProduct, Product, ProductId, ProductInput};
