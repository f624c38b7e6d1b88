//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use emporium_core::{CategoryId, format_money};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::Product;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub formatted_price: String,
    pub in_stock: bool,
    pub on_sale: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            product: product.clone(),
            formatted_price: format_money(product.reference.price),
            in_stock: product.in_stock(),
            on_sale: product.on_sale(),
        }
    }
}

/// Listing filters.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<CategoryId>,
}

/// List catalog products, optionally within one category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<ProductView>> {
    let products = state
        .catalog()
        .list()
        .iter()
        .filter(|p| {
            query
                .category
                .as_ref()
                .is_none_or(|category| p.category.as_ref() == Some(category))
        })
        .map(ProductView::from)
        .collect();

    Json(products)
}

/// Show one product by slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductView>> {
    state
        .catalog()
        .by_slug(&slug)
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))
}
