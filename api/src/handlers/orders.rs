//! Order handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::customers::CustomerResponse;
use super::extract::{ApiJson, ApiPath};
use super::products::ProductResponse;
use crate::app::ORDER_CREATED_MESSAGE;
use crate::domain::entities::{Order, OrderId, OrderInput, ProductId};
use crate::domain::filters::{OrderFilter, Page};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for listing orders
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub total_amount: Option<Decimal>,
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date: Option<DateTime<Utc>>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
    /// Case-insensitive match on the customer's name
    pub customer_name: Option<String>,
    /// Case-insensitive match on any attached product's name
    pub product_name: Option<String>,
    pub product_id: Option<Uuid>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ListOrdersQuery {
    pub fn filters(&self) -> Vec<OrderFilter> {
        let mut filters = Vec::new();
        if let Some(v) = self.total_amount {
            filters.push(OrderFilter::TotalEquals(v));
        }
        if let Some(v) = self.total_amount_gte {
            filters.push(OrderFilter::TotalAtLeast(v));
        }
        if let Some(v) = self.total_amount_lte {
            filters.push(OrderFilter::TotalAtMost(v));
        }
        if let Some(t) = self.order_date {
            filters.push(OrderFilter::OrderDateEquals(t));
        }
        if let Some(t) = self.order_date_gte {
            filters.push(OrderFilter::OrderedFrom(t));
        }
        if let Some(t) = self.order_date_lte {
            filters.push(OrderFilter::OrderedUntil(t));
        }
        if let Some(v) = &self.customer_name {
            filters.push(OrderFilter::CustomerNameContains(v.clone()));
        }
        if let Some(v) = &self.product_name {
            filters.push(OrderFilter::ProductNameContains(v.clone()));
        }
        if let Some(id) = self.product_id {
            filters.push(OrderFilter::HasProduct(ProductId(id)));
        }
        filters
    }

    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Order as returned by the API, with its customer and products embedded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub customer: CustomerResponse,
    pub products: Vec<ProductResponse>,
    pub total_amount: Decimal,
    pub order_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id.to_string(),
            customer: o.customer.into(),
            products: o.products.into_iter().map(Into::into).collect(),
            total_amount: o.total_amount,
            order_date: o.order_date.to_rfc3339(),
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order: OrderResponse,
    pub message: &'static str,
}

/// POST /orders
///
/// Body: `{customerId, productIds, orderDate?}`. The order, its product links
/// and its total are written in one transaction.
pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<OrderInput>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let order = state.order_service.create(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order: order.into(),
            message: ORDER_CREATED_MESSAGE,
        }),
    ))
}

/// GET /orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state
        .order_service
        .list(&query.filters(), query.page())
        .await?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .order_service
        .get(&OrderId(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

    Ok(Json(order.into()))
}
