//! Product handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::PRODUCT_CREATED_MESSAGE;
use crate::domain::entities::{Product, ProductId, ProductInput};
use crate::domain::filters::{Page, ProductFilter};
use super::extract::{ApiJson, ApiPath};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for listing products
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub name: Option<String>,
    pub name_icontains: Option<String>,
    pub price: Option<Decimal>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock: Option<i32>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
    /// `false` is the same as leaving it out
    pub low_stock: Option<bool>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ListProductsQuery {
    pub fn filters(&self) -> Vec<ProductFilter> {
        let mut filters = Vec::new();
        if let Some(v) = &self.name {
            filters.push(ProductFilter::NameEquals(v.clone()));
        }
        if let Some(v) = &self.name_icontains {
            filters.push(ProductFilter::NameContains(v.clone()));
        }
        if let Some(v) = self.price {
            filters.push(ProductFilter::PriceEquals(v));
        }
        if let Some(v) = self.price_gte {
            filters.push(ProductFilter::PriceAtLeast(v));
        }
        if let Some(v) = self.price_lte {
            filters.push(ProductFilter::PriceAtMost(v));
        }
        if let Some(v) = self.stock {
            filters.push(ProductFilter::StockEquals(v));
        }
        if let Some(v) = self.stock_gte {
            filters.push(ProductFilter::StockAtLeast(v));
        }
        if let Some(v) = self.stock_lte {
            filters.push(ProductFilter::StockAtMost(v));
        }
        if self.low_stock == Some(true) {
            filters.push(ProductFilter::LowStock);
        }
        filters
    }

    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Product as returned by the API. `price` serializes as a decimal string.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name,
            price: p.price,
            stock: p.stock,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub product: ProductResponse,
    pub message: &'static str,
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<CreateProductResponse>), AppError> {
    let product = state.product_service.create(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            product: product.into(),
            message: PRODUCT_CREATED_MESSAGE,
        }),
    ))
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state
        .product_service
        .list(&query.filters(), query.page())
        .await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/:id
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .product_service
        .get(&ProductId(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_product;
    use axum::http::Uri;
    use std::str::FromStr;

    fn parse_query(uri: &str) -> ListProductsQuery {
        let uri: Uri = uri.parse().unwrap();
        Query::<ListProductsQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn low_stock_false_is_ignored() {
        assert!(parse_query("/products?low_stock=false").filters().is_empty());
        assert_eq!(
            parse_query("/products?low_stock=true").filters(),
            vec![ProductFilter::LowStock]
        );
    }

    #[test]
    fn price_range_parses_decimals() {
        let filters = parse_query("/products?price_gte=9.99&price_lte=100").filters();

        assert_eq!(
            filters,
            vec![
                ProductFilter::PriceAtLeast(Decimal::from_str("9.99").unwrap()),
                ProductFilter::PriceAtMost(Decimal::from(100)),
            ]
        );
    }

    #[test]
    fn parse_create_request_accepts_number_or_string_price() {
        let from_number: ProductInput =
            serde_json::from_str(r#"{"name": "Mouse", "price": 9.99}"#).unwrap();
        let from_string: ProductInput =
            serde_json::from_str(r#"{"name": "Mouse", "price": "9.99", "stock": 3}"#).unwrap();

        assert_eq!(from_number.price, from_string.price);
        assert_eq!(from_number.stock, None);
        assert_eq!(from_string.stock, Some(3));
    }

    #[test]
    fn product_response_serializes_price_as_string() {
        let value = serde_json::to_value(ProductResponse::from(test_product())).unwrap();

        assert_eq!(value["price"], "19.99");
        assert!(value.get("updatedAt").is_some());
    }
}
