//! Order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use emporium_core::{Order, OrderNumber};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::orders::{DEFAULT_PAGE_LIMIT, OrderPage};
use crate::state::AppState;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// List orders, newest first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<OrderPage>> {
    let page = state
        .orders()
        .list(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
        .await?;
    Ok(Json(page))
}

/// Show one order, e.g. for the confirmation page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(order_number): Path<OrderNumber>,
) -> Result<Json<Order>> {
    state
        .orders()
        .find(&order_number)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {order_number}")))
}
