//! Application state shared across handlers.

use std::sync::Arc;

use emporium_core::{LocaleResolver, PricingPolicy};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::contacts::ContactInbox;
use crate::dictionary::Dictionaries;
use crate::orders::{InMemoryOrderRepository, OrderRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, order store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: Arc<dyn OrderRepository>,
    contacts: ContactInbox,
    locale: LocaleResolver,
    dictionaries: Dictionaries,
}

impl AppState {
    /// Create a new application state backed by an in-memory order store.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self::with_orders(config, catalog, Arc::new(InMemoryOrderRepository::new()))
    }

    /// Create a new application state with an explicit order store.
    #[must_use]
    pub fn with_orders(
        config: StorefrontConfig,
        catalog: Catalog,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        let locale = LocaleResolver::new(config.locales.clone());
        let dictionaries = Dictionaries::bundled(config.locales.default_locale());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
                contacts: ContactInbox::new(),
                locale,
                dictionaries,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &dyn OrderRepository {
        self.inner.orders.as_ref()
    }

    /// Get a reference to the contact message inbox.
    #[must_use]
    pub fn contacts(&self) -> &ContactInbox {
        &self.inner.contacts
    }

    /// Get a reference to the localized UI strings.
    #[must_use]
    pub fn dictionaries(&self) -> &Dictionaries {
        &self.inner.dictionaries
    }

    /// Get a reference to the locale resolver.
    #[must_use]
    pub fn locale(&self) -> &LocaleResolver {
        &self.inner.locale
    }

    /// Get the active tax and shipping rules.
    #[must_use]
    pub fn pricing(&self) -> &PricingPolicy {
        &self.inner.config.pricing
    }
}
