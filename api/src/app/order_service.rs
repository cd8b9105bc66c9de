//! Order service
//!
//! Order creation runs as one transaction: the customer and every product are
//! resolved, the order row is inserted, the products are linked and the total
//! is stored. Any failure rolls the whole thing back.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{sum_prices, Order, OrderId, OrderInput, Product};
use crate::domain::filters::{OrderFilter, Page};
use crate::domain::ports::{OrderRepository, OrderTransaction};
use crate::domain::validation::validate_amount;
use crate::error::{DomainError, ValidationError};

pub const ORDER_CREATED_MESSAGE: &str = "Order created successfully";

/// Service for creating and reading orders
pub struct OrderService<OR>
where
    OR: OrderRepository,
{
    orders: Arc<OR>,
}

impl<OR> OrderService<OR>
where
    OR: OrderRepository,
{
    pub fn new(orders: Arc<OR>) -> Self {
        Self { orders }
    }

    /// Create an order for a customer
    ///
    /// `total_amount` is the sum of the current prices of the distinct products
    /// referenced. Repeated product ids must each resolve but are linked once.
    pub async fn create(&self, input: &OrderInput) -> Result<Order, DomainError> {
        let mut tx = self.orders.begin().await?;

        match Self::create_in(&mut tx, input).await {
            Ok(order) => {
                tx.commit().await?;
                tracing::info!(
                    order_id = %order.id,
                    customer_id = %order.customer.id,
                    total = %order.total_amount,
                    products = order.products.len(),
                    "Created order"
                );
                Ok(order)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Failed to roll back order transaction");
                }
                Err(e)
            }
        }
    }

    async fn create_in(tx: &mut OR::Tx, input: &OrderInput) -> Result<Order, DomainError> {
        let customer = tx
            .find_customer(&input.customer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer", input.customer_id))?;

        if input.product_ids.is_empty() {
            return Err(ValidationError::new(
                "product_ids",
                "At least one product must be selected",
            )
            .into());
        }

        let mut seen = HashSet::new();
        let mut products: Vec<Product> = Vec::with_capacity(input.product_ids.len());
        for product_id in &input.product_ids {
            let product = tx
                .find_product(product_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Product", product_id))?;
            if seen.insert(product.id) {
                products.push(product);
            }
        }

        let order_date = input.order_date.unwrap_or_else(Utc::now);
        let record = tx.insert_order(&customer.id, order_date).await?;

        let product_ids: Vec<_> = products.iter().map(|p| p.id).collect();
        tx.attach_products(&record.id, &product_ids).await?;

        let total = sum_prices(&products);
        validate_amount("total_amount", total)?;
        let record = tx.set_total(&record.id, total).await?;

        Ok(record.into_order(customer, products))
    }

    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        self.orders.find_by_id(id).await
    }

    /// List orders, newest order date first
    pub async fn list(&self, filters: &[OrderFilter], page: Page) -> Result<Vec<Order>, DomainError> {
        self.orders.list(filters, page).await
    }
}
