//! List filter predicates
//!
//! Each list operation takes a slice of predicates that are combined with AND.
//! Every variant names the column (or the relation it goes through) and the
//! comparison it performs. Text `*Contains` matches are case-insensitive.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::entities::ProductId;

/// Products with stock below this count as low stock
pub const LOW_STOCK_THRESHOLD: i32 = 10;

pub const DEFAULT_PAGE_LIMIT: u64 = 100;
pub const MAX_PAGE_LIMIT: u64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerFilter {
    NameEquals(String),
    NameContains(String),
    EmailEquals(String),
    EmailContains(String),
    PhoneEquals(String),
    PhoneStartsWith(String),
    /// created_at >= value
    CreatedFrom(DateTime<Utc>),
    /// created_at <= value
    CreatedUntil(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    NameEquals(String),
    NameContains(String),
    PriceEquals(Decimal),
    PriceAtLeast(Decimal),
    PriceAtMost(Decimal),
    StockEquals(i32),
    StockAtLeast(i32),
    StockAtMost(i32),
    /// stock < LOW_STOCK_THRESHOLD
    LowStock,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderFilter {
    TotalEquals(Decimal),
    TotalAtLeast(Decimal),
    TotalAtMost(Decimal),
    OrderDateEquals(DateTime<Utc>),
    OrderedFrom(DateTime<Utc>),
    OrderedUntil(DateTime<Utc>),
    /// orders → customers.name
    CustomerNameContains(String),
    /// orders → order_products → products.name
    ProductNameContains(String),
    /// orders → order_products.product_id
    HasProduct(ProductId),
}

/// Offset window over a sorted list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    /// Build a page, clamping the limit to `1..=MAX_PAGE_LIMIT`
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}
