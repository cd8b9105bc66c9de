//! Order domain entity
//!
//! An order belongs to exactly one customer and references a non-empty set of
//! products. `total_amount` is a snapshot taken when the order is created: later
//! price changes on the products are not reflected in it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::customer::{Customer, CustomerId};
use super::product::{Product, ProductId};

/// Unique identifier for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An order with its customer and products resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    /// Sorted by product name
    pub products: Vec<Product>,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The bare `orders` row, without its relations
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Attach resolved relations to the row
    pub fn into_order(self, customer: Customer, mut products: Vec<Product>) -> Order {
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Order {
            id: self.id,
            customer,
            products,
            total_amount: self.total_amount,
            order_date: self.order_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Raw order request as submitted by a caller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
    /// Defaults to the time the order is created
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
}

/// Sum of product prices
pub fn sum_prices(products: &[Product]) -> Decimal {
    products.iter().map(|p| p.price).sum()
}
