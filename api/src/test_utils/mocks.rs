//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.
//! Clones share the same underlying storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Customer, CustomerId, NewCustomer, NewProduct, Order, OrderId, OrderRecord, Product,
    ProductId,
};
use crate::domain::filters::{
    CustomerFilter, OrderFilter, Page, ProductFilter, LOW_STOCK_THRESHOLD,
};
use crate::domain::ports::{
    CustomerRepository, OrderRepository, OrderTransaction, ProductRepository,
};
use crate::error::DomainError;

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

/// Newest first; ties keep the later insertion first
fn newest_first<T>(mut items: Vec<T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    items.reverse();
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    items
}

fn mock_db_error() -> DomainError {
    DomainError::Database("Mock failure".to_string())
}

// ============================================================================
// In-Memory Customer Repository
// ============================================================================

#[derive(Default, Clone)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<Vec<Customer>>>,
    /// Emails the unique constraint knows about but lookups miss (a concurrent insert)
    hidden_emails: Arc<RwLock<HashSet<String>>>,
    /// Emails whose insert fails with a database error
    failing_emails: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a customer for testing
    pub fn with_customer(self, customer: Customer) -> Self {
        self.customers.write().unwrap().push(customer);
        self
    }

    pub fn with_hidden_email(self, email: &str) -> Self {
        self.hidden_emails.write().unwrap().insert(email.to_string());
        self
    }

    pub fn failing_on_email(self, email: &str) -> Self {
        self.failing_emails.write().unwrap().insert(email.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.customers.read().unwrap().len()
    }
}

pub fn customer_matches(filter: &CustomerFilter, customer: &Customer) -> bool {
    match filter {
        CustomerFilter::NameEquals(v) => customer.name == *v,
        CustomerFilter::NameContains(v) => contains_ignore_case(&customer.name, v),
        CustomerFilter::EmailEquals(v) => customer.email == *v,
        CustomerFilter::EmailContains(v) => contains_ignore_case(&customer.email, v),
        CustomerFilter::PhoneEquals(v) => customer.phone.as_deref() == Some(v.as_str()),
        CustomerFilter::PhoneStartsWith(v) => customer
            .phone
            .as_deref()
            .map(|p| p.starts_with(v.as_str()))
            .unwrap_or(false),
        CustomerFilter::CreatedFrom(t) => customer.created_at >= *t,
        CustomerFilter::CreatedUntil(t) => customer.created_at <= *t,
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.read().unwrap();
        Ok(customers.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.read().unwrap();
        Ok(customers.iter().find(|c| c.email == email).cloned())
    }

    async fn create(&self, new_customer: &NewCustomer) -> Result<Customer, DomainError> {
        if self.failing_emails.read().unwrap().contains(&new_customer.email) {
            return Err(mock_db_error());
        }

        let mut customers = self.customers.write().unwrap();
        let taken = customers.iter().any(|c| c.email == new_customer.email)
            || self.hidden_emails.read().unwrap().contains(&new_customer.email);
        if taken {
            return Err(DomainError::duplicate_email(&new_customer.email));
        }

        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::new(),
            name: new_customer.name.clone(),
            email: new_customer.email.clone(),
            phone: new_customer.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        customers.push(customer.clone());

        Ok(customer)
    }

    async fn list(
        &self,
        filters: &[CustomerFilter],
        page: Page,
    ) -> Result<Vec<Customer>, DomainError> {
        let customers = self.customers.read().unwrap();
        let matching: Vec<Customer> = customers
            .iter()
            .filter(|c| filters.iter().all(|f| customer_matches(f, c)))
            .cloned()
            .collect();

        Ok(paginate(newest_first(matching, |c| c.created_at), page))
    }
}

// ============================================================================
// In-Memory Product Repository
// ============================================================================

#[derive(Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a product for testing
    pub fn with_product(self, product: Product) -> Self {
        self.products.write().unwrap().push(product);
        self
    }

    pub fn len(&self) -> usize {
        self.products.read().unwrap().len()
    }
}

pub fn product_matches(filter: &ProductFilter, product: &Product) -> bool {
    match filter {
        ProductFilter::NameEquals(v) => product.name == *v,
        ProductFilter::NameContains(v) => contains_ignore_case(&product.name, v),
        ProductFilter::PriceEquals(v) => product.price == *v,
        ProductFilter::PriceAtLeast(v) => product.price >= *v,
        ProductFilter::PriceAtMost(v) => product.price <= *v,
        ProductFilter::StockEquals(v) => product.stock == *v,
        ProductFilter::StockAtLeast(v) => product.stock >= *v,
        ProductFilter::StockAtMost(v) => product.stock <= *v,
        ProductFilter::LowStock => product.stock < LOW_STOCK_THRESHOLD,
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let products = self.products.read().unwrap();
        Ok(products.iter().find(|p| p.id == *id).cloned())
    }

    async fn create(&self, new_product: &NewProduct) -> Result<Product, DomainError> {
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(),
            name: new_product.name.clone(),
            price: new_product.price,
            stock: new_product.stock,
            created_at: now,
            updated_at: now,
        };
        self.products.write().unwrap().push(product.clone());

        Ok(product)
    }

    async fn list(
        &self,
        filters: &[ProductFilter],
        page: Page,
    ) -> Result<Vec<Product>, DomainError> {
        let products = self.products.read().unwrap();
        let mut matching: Vec<Product> = products
            .iter()
            .filter(|p| filters.iter().all(|f| product_matches(f, p)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(paginate(matching, page))
    }
}

// ============================================================================
// In-Memory Order Repository
// ============================================================================

/// Step at which an order transaction reports a storage fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InsertOrder,
    AttachProducts,
    SetTotal,
    Commit,
}

/// Order store that resolves customers and products from the given repositories.
///
/// Writes made through a transaction are staged and only become visible on commit.
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    customers: Arc<RwLock<Vec<Customer>>>,
    products: Arc<RwLock<Vec<Product>>>,
    orders: Arc<RwLock<Vec<OrderRecord>>>,
    links: Arc<RwLock<Vec<(OrderId, ProductId)>>>,
    fail_at: Option<FailPoint>,
    committed: Arc<AtomicUsize>,
    rolled_back: Arc<AtomicUsize>,
}

impl InMemoryOrderRepository {
    pub fn new(customers: &InMemoryCustomerRepository, products: &InMemoryProductRepository) -> Self {
        Self {
            customers: customers.customers.clone(),
            products: products.products.clone(),
            orders: Arc::default(),
            links: Arc::default(),
            fail_at: None,
            committed: Arc::default(),
            rolled_back: Arc::default(),
        }
    }

    pub fn failing_at(mut self, point: FailPoint) -> Self {
        self.fail_at = Some(point);
        self
    }

    pub fn order_count(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    pub fn link_count(&self) -> usize {
        self.links.read().unwrap().len()
    }

    pub fn committed(&self) -> usize {
        self.committed.load(Ordering::SeqCst)
    }

    pub fn rolled_back(&self) -> usize {
        self.rolled_back.load(Ordering::SeqCst)
    }

    /// Change a product's price after the fact
    pub fn set_product_price(&self, id: &ProductId, price: Decimal) {
        let mut products = self.products.write().unwrap();
        if let Some(product) = products.iter_mut().find(|p| p.id == *id) {
            product.price = price;
        }
    }

    fn load(&self, record: &OrderRecord) -> Result<Order, DomainError> {
        let customer = self
            .customers
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == record.customer_id)
            .cloned()
            .ok_or_else(|| DomainError::Internal(format!("Order {} has no customer", record.id)))?;

        let linked: Vec<ProductId> = self
            .links
            .read()
            .unwrap()
            .iter()
            .filter(|(order_id, _)| *order_id == record.id)
            .map(|(_, product_id)| *product_id)
            .collect();
        let products: Vec<Product> = self
            .products
            .read()
            .unwrap()
            .iter()
            .filter(|p| linked.contains(&p.id))
            .cloned()
            .collect();

        Ok(record.clone().into_order(customer, products))
    }
}

pub fn order_matches(filter: &OrderFilter, order: &Order) -> bool {
    match filter {
        OrderFilter::TotalEquals(v) => order.total_amount == *v,
        OrderFilter::TotalAtLeast(v) => order.total_amount >= *v,
        OrderFilter::TotalAtMost(v) => order.total_amount <= *v,
        OrderFilter::OrderDateEquals(t) => order.order_date == *t,
        OrderFilter::OrderedFrom(t) => order.order_date >= *t,
        OrderFilter::OrderedUntil(t) => order.order_date <= *t,
        OrderFilter::CustomerNameContains(v) => contains_ignore_case(&order.customer.name, v),
        OrderFilter::ProductNameContains(v) => order
            .products
            .iter()
            .any(|p| contains_ignore_case(&p.name, v)),
        OrderFilter::HasProduct(id) => order.products.iter().any(|p| p.id == *id),
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    type Tx = InMemoryOrderTransaction;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        Ok(InMemoryOrderTransaction {
            repo: self.clone(),
            staged_orders: Vec::new(),
            staged_links: Vec::new(),
        })
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let record = self
            .orders
            .read()
            .unwrap()
            .iter()
            .find(|o| o.id == *id)
            .cloned();

        record.map(|r| self.load(&r)).transpose()
    }

    async fn list(&self, filters: &[OrderFilter], page: Page) -> Result<Vec<Order>, DomainError> {
        let records = self.orders.read().unwrap().clone();
        let mut orders = Vec::with_capacity(records.len());
        for record in &records {
            let order = self.load(record)?;
            if filters.iter().all(|f| order_matches(f, &order)) {
                orders.push(order);
            }
        }

        Ok(paginate(newest_first(orders, |o| o.order_date), page))
    }
}

pub struct InMemoryOrderTransaction {
    repo: InMemoryOrderRepository,
    staged_orders: Vec<OrderRecord>,
    staged_links: Vec<(OrderId, ProductId)>,
}

impl InMemoryOrderTransaction {
    fn check(&self, point: FailPoint) -> Result<(), DomainError> {
        if self.repo.fail_at == Some(point) {
            Err(mock_db_error())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl OrderTransaction for InMemoryOrderTransaction {
    async fn find_customer(&mut self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        let customers = self.repo.customers.read().unwrap();
        Ok(customers.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_product(&mut self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let products = self.repo.products.read().unwrap();
        Ok(products.iter().find(|p| p.id == *id).cloned())
    }

    async fn insert_order(
        &mut self,
        customer_id: &CustomerId,
        order_date: DateTime<Utc>,
    ) -> Result<OrderRecord, DomainError> {
        self.check(FailPoint::InsertOrder)?;

        let now = Utc::now();
        let record = OrderRecord {
            id: OrderId::new(),
            customer_id: *customer_id,
            total_amount: Decimal::ZERO,
            order_date,
            created_at: now,
            updated_at: now,
        };
        self.staged_orders.push(record.clone());

        Ok(record)
    }

    async fn attach_products(
        &mut self,
        order_id: &OrderId,
        product_ids: &[ProductId],
    ) -> Result<(), DomainError> {
        self.check(FailPoint::AttachProducts)?;

        self.staged_links
            .extend(product_ids.iter().map(|product_id| (*order_id, *product_id)));
        Ok(())
    }

    async fn set_total(
        &mut self,
        order_id: &OrderId,
        total: Decimal,
    ) -> Result<OrderRecord, DomainError> {
        self.check(FailPoint::SetTotal)?;

        let record = self
            .staged_orders
            .iter_mut()
            .find(|o| o.id == *order_id)
            .ok_or_else(|| DomainError::not_found("Order", order_id))?;
        record.total_amount = total;
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn commit(self) -> Result<(), DomainError> {
        self.check(FailPoint::Commit)?;

        self.repo.orders.write().unwrap().extend(self.staged_orders);
        self.repo.links.write().unwrap().extend(self.staged_links);
        self.repo.committed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self) -> Result<(), DomainError> {
        self.repo.rolled_back.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
