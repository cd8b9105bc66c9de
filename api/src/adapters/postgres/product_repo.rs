//! PostgreSQL adapter for ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::filters::icontains;
use crate::domain::entities::{NewProduct, Product, ProductId};
use crate::domain::filters::{Page, ProductFilter, LOW_STOCK_THRESHOLD};
use crate::domain::ports::ProductRepository;
use crate::entity::products;
use crate::error::DomainError;

/// PostgreSQL implementation of ProductRepository
pub struct PostgresProductRepository {
    db: DatabaseConnection,
}

impl PostgresProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn product_condition(filters: &[ProductFilter]) -> Condition {
    filters.iter().fold(Condition::all(), |cond, filter| {
        cond.add(match filter {
            ProductFilter::NameEquals(v) => products::Column::Name.eq(v.as_str()),
            ProductFilter::NameContains(v) => icontains(products::Column::Name, v),
            ProductFilter::PriceEquals(v) => products::Column::Price.eq(*v),
            ProductFilter::PriceAtLeast(v) => products::Column::Price.gte(*v),
            ProductFilter::PriceAtMost(v) => products::Column::Price.lte(*v),
            ProductFilter::StockEquals(v) => products::Column::Stock.eq(*v),
            ProductFilter::StockAtLeast(v) => products::Column::Stock.gte(*v),
            ProductFilter::StockAtMost(v) => products::Column::Stock.lte(*v),
            ProductFilter::LowStock => products::Column::Stock.lt(LOW_STOCK_THRESHOLD),
        })
    })
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let result = products::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(product.name.clone()),
            price: Set(product.price),
            stock: Set(product.stock),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn list(
        &self,
        filters: &[ProductFilter],
        page: Page,
    ) -> Result<Vec<Product>, DomainError> {
        let results = products::Entity::find()
            .filter(product_condition(filters))
            .order_by_asc(products::Column::Name)
            .order_by_asc(products::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Product {
            id: ProductId(model.id),
            name: model.name,
            price: model.price,
            stock: model.stock,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
