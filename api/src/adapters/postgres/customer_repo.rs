//! PostgreSQL adapter for CustomerRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use super::filters::{icontains, startswith};
use crate::domain::entities::{Customer, CustomerId, NewCustomer};
use crate::domain::filters::{CustomerFilter, Page};
use crate::domain::ports::CustomerRepository;
use crate::entity::customers;
use crate::error::DomainError;

/// PostgreSQL implementation of CustomerRepository
pub struct PostgresCustomerRepository {
    db: DatabaseConnection,
}

impl PostgresCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// AND of all predicates
pub(super) fn customer_condition(filters: &[CustomerFilter]) -> Condition {
    filters.iter().fold(Condition::all(), |cond, filter| {
        cond.add(match filter {
            CustomerFilter::NameEquals(v) => customers::Column::Name.eq(v.as_str()),
            CustomerFilter::NameContains(v) => icontains(customers::Column::Name, v),
            CustomerFilter::EmailEquals(v) => customers::Column::Email.eq(v.as_str()),
            CustomerFilter::EmailContains(v) => icontains(customers::Column::Email, v),
            CustomerFilter::PhoneEquals(v) => customers::Column::Phone.eq(v.as_str()),
            CustomerFilter::PhoneStartsWith(v) => startswith(customers::Column::Phone, v),
            CustomerFilter::CreatedFrom(t) => customers::Column::CreatedAt.gte(t.fixed_offset()),
            CustomerFilter::CreatedUntil(t) => customers::Column::CreatedAt.lte(t.fixed_offset()),
        })
    })
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        let result = customers::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        let result = customers::Entity::find()
            .filter(customers::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, customer: &NewCustomer) -> Result<Customer, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(customer.name.clone()),
            email: Set(customer.email.clone()),
            phone: Set(customer.phone.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::duplicate_email(&customer.email)
            }
            _ => DomainError::Database(e.to_string()),
        })?;

        Ok(result.into())
    }

    async fn list(
        &self,
        filters: &[CustomerFilter],
        page: Page,
    ) -> Result<Vec<Customer>, DomainError> {
        let results = customers::Entity::find()
            .filter(customer_condition(filters))
            .order_by_desc(customers::Column::CreatedAt)
            .order_by_desc(customers::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<customers::Model> for Customer {
    fn from(model: customers::Model) -> Self {
        Customer {
            id: CustomerId(model.id),
            name: model.name,
            email: model.email,
            phone: model.phone,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
