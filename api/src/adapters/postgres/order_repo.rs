//! PostgreSQL adapter for OrderRepository
//!
//! Writes go through [`PostgresOrderTransaction`], a thin wrapper over a SeaORM
//! `DatabaseTransaction`. Reads page over `orders` first and then batch-load the
//! customers, links and products for that page.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::filters::icontains;
use crate::domain::entities::{
    Customer, CustomerId, Order, OrderId, OrderRecord, Product, ProductId,
};
use crate::domain::filters::{OrderFilter, Page};
use crate::domain::ports::{OrderRepository, OrderTransaction};
use crate::entity::{customers, order_products, orders, products};
use crate::error::DomainError;

/// PostgreSQL implementation of OrderRepository
pub struct PostgresOrderRepository {
    db: DatabaseConnection,
}

impl PostgresOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn order_condition(filters: &[OrderFilter]) -> Condition {
    filters.iter().fold(Condition::all(), |cond, filter| {
        cond.add(match filter {
            OrderFilter::TotalEquals(v) => orders::Column::TotalAmount.eq(*v),
            OrderFilter::TotalAtLeast(v) => orders::Column::TotalAmount.gte(*v),
            OrderFilter::TotalAtMost(v) => orders::Column::TotalAmount.lte(*v),
            OrderFilter::OrderDateEquals(t) => orders::Column::OrderDate.eq(t.fixed_offset()),
            OrderFilter::OrderedFrom(t) => orders::Column::OrderDate.gte(t.fixed_offset()),
            OrderFilter::OrderedUntil(t) => orders::Column::OrderDate.lte(t.fixed_offset()),
            OrderFilter::CustomerNameContains(v) => orders::Column::CustomerId.in_subquery(
                Query::select()
                    .column(customers::Column::Id)
                    .from(customers::Entity)
                    .and_where(icontains(customers::Column::Name, v))
                    .to_owned(),
            ),
            OrderFilter::ProductNameContains(v) => orders::Column::Id.in_subquery(
                Query::select()
                    .column((order_products::Entity, order_products::Column::OrderId))
                    .from(order_products::Entity)
                    .inner_join(
                        products::Entity,
                        Expr::col((products::Entity, products::Column::Id))
                            .equals((order_products::Entity, order_products::Column::ProductId)),
                    )
                    .and_where(icontains(products::Column::Name, v))
                    .to_owned(),
            ),
            OrderFilter::HasProduct(id) => orders::Column::Id.in_subquery(
                Query::select()
                    .column(order_products::Column::OrderId)
                    .from(order_products::Entity)
                    .and_where(order_products::Column::ProductId.eq(id.0))
                    .to_owned(),
            ),
        })
    })
}

/// Resolve customers and products for a page of order rows, keeping row order
async fn load_orders<C>(conn: &C, rows: Vec<orders::Model>) -> Result<Vec<Order>, DomainError>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let customer_ids: HashSet<Uuid> = rows.iter().map(|r| r.customer_id).collect();
    let order_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let customers: HashMap<Uuid, Customer> = customers::Entity::find()
        .filter(customers::Column::Id.is_in(customer_ids))
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .into_iter()
        .map(|m| (m.id, Customer::from(m)))
        .collect();

    let links = order_products::Entity::find()
        .filter(order_products::Column::OrderId.is_in(order_ids))
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let product_ids: HashSet<Uuid> = links.iter().map(|l| l.product_id).collect();
    let products: HashMap<Uuid, Product> = products::Entity::find()
        .filter(products::Column::Id.is_in(product_ids))
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .into_iter()
        .map(|m| (m.id, Product::from(m)))
        .collect();

    let mut products_by_order: HashMap<Uuid, Vec<Product>> = HashMap::new();
    for link in links {
        if let Some(product) = products.get(&link.product_id) {
            products_by_order
                .entry(link.order_id)
                .or_default()
                .push(product.clone());
        }
    }

    rows.into_iter()
        .map(|row| {
            let customer = customers.get(&row.customer_id).cloned().ok_or_else(|| {
                DomainError::Internal(format!(
                    "Order {} references missing customer {}",
                    row.id, row.customer_id
                ))
            })?;
            let products = products_by_order.remove(&row.id).unwrap_or_default();
            Ok(OrderRecord::from(row).into_order(customer, products))
        })
        .collect()
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    type Tx = PostgresOrderTransaction;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(PostgresOrderTransaction { txn })
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let row = orders::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match row {
            Some(row) => Ok(load_orders(&self.db, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, filters: &[OrderFilter], page: Page) -> Result<Vec<Order>, DomainError> {
        let rows = orders::Entity::find()
            .filter(order_condition(filters))
            .order_by_desc(orders::Column::OrderDate)
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        load_orders(&self.db, rows).await
    }
}

/// Open order transaction
///
/// Dropping it without calling `commit` rolls back on the server.
pub struct PostgresOrderTransaction {
    txn: DatabaseTransaction,
}

#[async_trait]
impl OrderTransaction for PostgresOrderTransaction {
    async fn find_customer(&mut self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        let result = customers::Entity::find_by_id(id.0)
            .one(&self.txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_product(&mut self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let result = products::Entity::find_by_id(id.0)
            .one(&self.txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn insert_order(
        &mut self,
        customer_id: &CustomerId,
        order_date: DateTime<Utc>,
    ) -> Result<OrderRecord, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer_id.0),
            total_amount: Set(Decimal::ZERO),
            order_date: Set(order_date.fixed_offset()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn attach_products(
        &mut self,
        order_id: &OrderId,
        product_ids: &[ProductId],
    ) -> Result<(), DomainError> {
        if product_ids.is_empty() {
            return Ok(());
        }

        let links = product_ids.iter().map(|product_id| order_products::ActiveModel {
            order_id: Set(order_id.0),
            product_id: Set(product_id.0),
        });

        order_products::Entity::insert_many(links)
            .exec_without_returning(&self.txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn set_total(
        &mut self,
        order_id: &OrderId,
        total: Decimal,
    ) -> Result<OrderRecord, DomainError> {
        let model = orders::ActiveModel {
            id: Set(order_id.0),
            total_amount: Set(total),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let result = model
            .update(&self.txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn commit(self) -> Result<(), DomainError> {
        self.txn
            .commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn rollback(self) -> Result<(), DomainError> {
        self.txn
            .rollback()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl From<orders::Model> for OrderRecord {
    fn from(model: orders::Model) -> Self {
        OrderRecord {
            id: OrderId(model.id),
            customer_id: CustomerId(model.customer_id),
            total_amount: model.total_amount,
            order_date: model.order_date.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
