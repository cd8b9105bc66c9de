//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::entities::{
    Customer, CustomerId, NewCustomer, NewProduct, Order, OrderId, OrderRecord, Product,
    ProductId,
};
use crate::domain::filters::{CustomerFilter, OrderFilter, Page, ProductFilter};
use crate::error::DomainError;

/// Repository for Customer entities
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find a customer by ID
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError>;

    /// Find a customer by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError>;

    /// Insert a validated customer.
    ///
    /// A store-level uniqueness violation on email must surface as
    /// `DomainError::DuplicateKey`.
    async fn create(&self, customer: &NewCustomer) -> Result<Customer, DomainError>;

    /// List customers matching every filter, newest first
    async fn list(&self, filters: &[CustomerFilter], page: Page)
        -> Result<Vec<Customer>, DomainError>;
}

/// Repository for Product entities
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find a product by ID
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// Insert a validated product
    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError>;

    /// List products matching every filter, by name ascending
    async fn list(&self, filters: &[ProductFilter], page: Page)
        -> Result<Vec<Product>, DomainError>;
}

/// Repository for Order entities
///
/// Orders are only written through an [`OrderTransaction`] so that the order
/// row, its product links and its total are committed together.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    type Tx: OrderTransaction;

    /// Open a new transaction
    async fn begin(&self) -> Result<Self::Tx, DomainError>;

    /// Find an order (with customer and products) by ID
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// List orders matching every filter, newest order date first
    async fn list(&self, filters: &[OrderFilter], page: Page) -> Result<Vec<Order>, DomainError>;
}

/// Unit of work for writing a single order
///
/// Nothing done through the transaction is visible to other readers until
/// `commit` succeeds. Dropping it without committing discards all writes.
#[async_trait]
pub trait OrderTransaction: Send {
    async fn find_customer(&mut self, id: &CustomerId) -> Result<Option<Customer>, DomainError>;

    async fn find_product(&mut self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// Insert the order row with a zero total
    async fn insert_order(
        &mut self,
        customer_id: &CustomerId,
        order_date: DateTime<Utc>,
    ) -> Result<OrderRecord, DomainError>;

    /// Link products to the order. `product_ids` must not contain duplicates.
    async fn attach_products(
        &mut self,
        order_id: &OrderId,
        product_ids: &[ProductId],
    ) -> Result<(), DomainError>;

    /// Persist the computed total
    async fn set_total(
        &mut self,
        order_id: &OrderId,
        total: Decimal,
    ) -> Result<OrderRecord, DomainError>;

    async fn commit(self) -> Result<(), DomainError>;

    async fn rollback(self) -> Result<(), DomainError>;
}
