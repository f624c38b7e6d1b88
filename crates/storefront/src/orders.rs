//! Order storage.
//!
//! Placed orders go through the [`OrderRepository`] trait. The bundled
//! implementation keeps them in process memory; nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use emporium_core::{Order, OrderNumber};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

/// Largest page size `list` will return.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Order store failures.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("order already exists: {0}")]
    Duplicate(OrderNumber),
    #[error("order store unavailable: {0}")]
    Unavailable(String),
}

/// One page of orders, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub docs: Vec<Order>,
    pub total_docs: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Persistent store of placed orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store a new order.
    async fn create(&self, order: Order) -> Result<Order, OrderStoreError>;

    /// Find an order by its number.
    async fn find(&self, number: &OrderNumber) -> Result<Option<Order>, OrderStoreError>;

    /// List orders newest first. `page` is 1-based; `limit` is clamped to
    /// `1..=MAX_PAGE_LIMIT`.
    async fn list(&self, page: u32, limit: u32) -> Result<OrderPage, OrderStoreError>;
}

/// Orders held in memory.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    // Creation order; listing walks it backwards.
    orders: Vec<Order>,
    index: HashMap<OrderNumber, usize>,
}

impl InMemoryOrderRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: Order) -> Result<Order, OrderStoreError> {
        let mut inner = self.inner.write().await;
        if inner.index.contains_key(&order.order_number) {
            return Err(OrderStoreError::Duplicate(order.order_number));
        }

        let idx = inner.orders.len();
        inner.index.insert(order.order_number.clone(), idx);
        inner.orders.push(order.clone());
        Ok(order)
    }

    async fn find(&self, number: &OrderNumber) -> Result<Option<Order>, OrderStoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .index
            .get(number)
            .and_then(|&idx| inner.orders.get(idx))
            .cloned())
    }

    async fn list(&self, page: u32, limit: u32) -> Result<OrderPage, OrderStoreError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_LIMIT);

        let inner = self.inner.read().await;
        let total_docs = inner.orders.len();
        let skip = (page as usize - 1).saturating_mul(limit as usize);

        let docs: Vec<Order> = inner
            .orders
            .iter()
            .rev()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect();

        let total_pages = u32::try_from(total_docs.div_ceil(limit as usize)).unwrap_or(u32::MAX);

        Ok(OrderPage {
            docs,
            total_docs,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        })
    }
}
