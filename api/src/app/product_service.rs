//! Product service

use std::sync::Arc;

use crate::domain::entities::{Product, ProductId, ProductInput};
use crate::domain::filters::{Page, ProductFilter};
use crate::domain::ports::ProductRepository;
use crate::domain::validation::validate_product;
use crate::error::DomainError;

pub const PRODUCT_CREATED_MESSAGE: &str = "Product created successfully";

/// Service for managing products
pub struct ProductService<PR>
where
    PR: ProductRepository,
{
    products: Arc<PR>,
}

impl<PR> ProductService<PR>
where
    PR: ProductRepository,
{
    pub fn new(products: Arc<PR>) -> Self {
        Self { products }
    }

    /// Create a product after checking price, stock and name
    pub async fn create(&self, input: &ProductInput) -> Result<Product, DomainError> {
        let new_product = validate_product(input)?;
        let product = self.products.create(&new_product).await?;

        tracing::info!(product_id = %product.id, price = %product.price, "Created product");
        Ok(product)
    }

    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        self.products.find_by_id(id).await
    }

    /// List products by name
    pub async fn list(
        &self,
        filters: &[ProductFilter],
        page: Page,
    ) -> Result<Vec<Product>, DomainError> {
        self.products.list(filters, page).await
    }
}
