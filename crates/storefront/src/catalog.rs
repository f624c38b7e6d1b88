//! Read-only product catalog.
//!
//! Products are loaded once at startup from a JSON array on disk and held in
//! memory. Lookups go by product id (for cart operations) or slug (for
//! product pages).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use emporium_core::{CategoryId, ProductId, ProductRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stock tracking for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub track_quantity: bool,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub allow_backorder: bool,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            track_quantity: false,
            quantity: 0,
            allow_backorder: true,
        }
    }
}

impl Inventory {
    /// Whether `requested` more units can be sold.
    #[must_use]
    pub const fn can_sell(&self, requested: u32) -> bool {
        !self.track_quantity || self.allow_backorder || requested <= self.quantity
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub reference: ProductRef,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub inventory: Inventory,
}

impl Product {
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.reference.id
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.reference.slug
    }

    /// Whether at least one unit can be sold.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.inventory.can_sell(1)
    }

    /// Whether the product is discounted against its compare-at price.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.compare_at_price
            .is_some_and(|compare| compare > self.reference.price)
    }
}

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("Duplicate product slug: {0}")]
    DuplicateSlug(String),
    #[error("Negative price for product: {0}")]
    NegativePrice(ProductId),
}

/// In-memory product catalog, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
    by_id: Arc<HashMap<ProductId, usize>>,
    by_slug: Arc<HashMap<String, usize>>,
}

impl Catalog {
    /// Load the catalog from a JSON file.
    ///
    /// A missing file yields an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if two products share an id or slug.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            tracing::warn!("Catalog file does not exist: {:?}", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        let catalog = Self::from_products(products)?;
        tracing::info!(products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Build a catalog from products, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an id or slug, or if a price
    /// is negative.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut by_slug = HashMap::with_capacity(products.len());

        for (idx, product) in products.iter().enumerate() {
            if product.reference.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice(product.id().clone()));
            }
            if by_id.insert(product.id().clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(product.id().clone()));
            }
            if by_slug.insert(product.slug().to_string(), idx).is_some() {
                return Err(CatalogError::DuplicateSlug(product.slug().to_string()));
            }
        }

        Ok(Self {
            products: Arc::new(products),
            by_id: Arc::new(by_id),
            by_slug: Arc::new(by_slug),
        })
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.by_id.get(id).and_then(|&idx| self.products.get(idx))
    }

    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&Product> {
        self.by_slug.get(slug).and_then(|&idx| self.products.get(idx))
    }

    /// All products, in file order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
