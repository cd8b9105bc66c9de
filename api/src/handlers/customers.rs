//! Customer handlers
//!
//! Endpoints for creating, importing and browsing customers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::CUSTOMER_CREATED_MESSAGE;
use crate::domain::entities::{Customer, CustomerId, CustomerInput};
use crate::domain::filters::{CustomerFilter, Page};
use super::extract::{ApiJson, ApiPath};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for listing customers
#[derive(Debug, Default, Deserialize)]
pub struct ListCustomersQuery {
    pub name: Option<String>,
    pub name_icontains: Option<String>,
    pub email: Option<String>,
    pub email_icontains: Option<String>,
    pub phone: Option<String>,
    pub phone_startswith: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ListCustomersQuery {
    pub fn filters(&self) -> Vec<CustomerFilter> {
        let mut filters = Vec::new();
        if let Some(v) = &self.name {
            filters.push(CustomerFilter::NameEquals(v.clone()));
        }
        if let Some(v) = &self.name_icontains {
            filters.push(CustomerFilter::NameContains(v.clone()));
        }
        if let Some(v) = &self.email {
            filters.push(CustomerFilter::EmailEquals(v.clone()));
        }
        if let Some(v) = &self.email_icontains {
            filters.push(CustomerFilter::EmailContains(v.clone()));
        }
        if let Some(v) = &self.phone {
            filters.push(CustomerFilter::PhoneEquals(v.clone()));
        }
        if let Some(v) = &self.phone_startswith {
            filters.push(CustomerFilter::PhoneStartsWith(v.clone()));
        }
        if let Some(t) = self.created_at_gte {
            filters.push(CustomerFilter::CreatedFrom(t));
        }
        if let Some(t) = self.created_at_lte {
            filters.push(CustomerFilter::CreatedUntil(t));
        }
        filters
    }

    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Customer as returned by the API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name,
            email: c.email,
            phone: c.phone,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateCustomerResponse {
    pub customer: CustomerResponse,
    pub message: &'static str,
}

/// Response for a bulk import
///
/// `errors` is omitted when every row was accepted.
#[derive(Debug, Serialize)]
pub struct BulkCreateCustomersResponse {
    pub customers: Vec<CustomerResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// POST /customers
pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> Result<(StatusCode, Json<CreateCustomerResponse>), AppError> {
    let customer = state.customer_service.create(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCustomerResponse {
            customer: customer.into(),
            message: CUSTOMER_CREATED_MESSAGE,
        }),
    ))
}

/// POST /customers/bulk
///
/// Accepts an array of customers. Valid rows are created even when others fail;
/// failures are reported per row.
pub async fn bulk_create_customers(
    State(state): State<AppState>,
    ApiJson(inputs): ApiJson<Vec<CustomerInput>>,
) -> Result<Json<BulkCreateCustomersResponse>, AppError> {
    let result = state.customer_service.bulk_create(&inputs).await;

    Ok(Json(BulkCreateCustomersResponse {
        customers: result.customers.into_iter().map(Into::into).collect(),
        errors: (!result.errors.is_empty()).then_some(result.errors),
    }))
}

/// GET /customers
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state
        .customer_service
        .list(&query.filters(), query.page())
        .await?;

    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// GET /customers/:id
pub async fn get_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = state
        .customer_service
        .get(&CustomerId(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))?;

    Ok(Json(customer.into()))
}
