//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::entities::{
    Customer, CustomerId, CustomerInput, Product, ProductId, ProductInput,
};

/// Create a test customer with default values
pub fn test_customer() -> Customer {
    test_customer_named("Test Customer", "test.customer@example.com")
}

/// Create a test customer with a specific name and email
pub fn test_customer_named(name: &str, email: &str) -> Customer {
    let now = Utc::now();
    Customer {
        id: CustomerId::new(),
        name: name.to_string(),
        email: email.to_string(),
        phone: Some("+1234567890".to_string()),
        created_at: now,
        updated_at: now,
    }
}

/// Create a test product with default values
pub fn test_product() -> Product {
    test_product_priced("Test Product", Decimal::new(1999, 2))
}

/// Create a test product with a specific name and price
pub fn test_product_priced(name: &str, price: Decimal) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(),
        name: name.to_string(),
        price,
        stock: 25,
        created_at: now,
        updated_at: now,
    }
}

/// Customer input without a phone
pub fn customer_input(name: &str, email: &str) -> CustomerInput {
    CustomerInput {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
    }
}

/// Product input with a price given as a decimal string
pub fn product_input(name: &str, price: &str, stock: Option<i32>) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        price: Decimal::from_str(price).expect("valid decimal literal"),
        stock,
    }
}
